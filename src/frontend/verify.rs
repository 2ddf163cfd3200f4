//! Cross-option validation and derived values, run once per component.

use std::path::Path;

use thiserror::Error;

use crate::codec::Hint;
use crate::config::SiteConfig;
use crate::env::EnvSource;
use crate::options::Context;
use crate::state::JobOptions;

/// Scheduler parameter making allocations wait for every node to boot.
const ALLOC_WAIT_NODES: &str = "salloc_wait_nodes";
/// Same, for batch submissions.
const BATCH_WAIT_NODES: &str = "sbatch_wait_nodes";

/// Errors produced while verifying a resolved component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("don't specify both --verbose (-v) and --quiet (-Q)")]
    QuietAndVerbose,

    #[error("invalid hint in environment: {0}")]
    InvalidHint(String),

    #[error("invalid number of tasks (-n {0})")]
    InvalidTaskCount(i32),

    #[error("invalid number of cpus per task (-c {0})")]
    InvalidCpusPerTask(i32),

    #[error("invalid number of nodes (-N {0})")]
    InvalidNodeCount(String),

    #[error("Too few processes for the requested {{plane,node}} distribution")]
    PlaneDistribution,

    #[error("Incompatible begin and deadline time specification")]
    DeadlineBeforeBegin,

    #[error("No command given to execute")]
    NoCommand,
}

/// Check `opts` and fill in values derived from other options.
///
/// `is_last` marks the component that owns the job's command.
pub fn verify(
    opts: &mut JobOptions,
    command: &mut Vec<String>,
    site: &SiteConfig,
    env: &dyn EnvSource,
    is_last: bool,
) -> Result<(), VerifyError> {
    if opts.quiet > 0 && opts.verbose > 0 {
        return Err(VerifyError::QuietAndVerbose);
    }

    if let Some(hint) = opts.hint_env.clone() {
        if !opts.hint_set && !opts.ntasks_per_core_set && !opts.threads_per_core_set {
            let hint = Hint::parse(&hint).map_err(|e| VerifyError::InvalidHint(e.to_string()))?;
            hint.apply(&mut opts.layout, &mut opts.ntasks_per_core);
        }
    }

    if let Some(per_node) = opts.ntasks_per_node.filter(|n| *n > 0) {
        if !opts.ntasks_set {
            opts.ntasks = clamp_tasks(i64::from(opts.nodes.min) * i64::from(per_node));
            opts.ntasks_set = true;
        }
    }

    if let Some(cpus) = opts.cpus_per_task {
        if opts.min_cpus.map_or(true, |min| min < cpus) {
            opts.min_cpus = Some(cpus);
        }
    }

    default_command(opts, command, site, env, is_last)?;

    if opts.job_name.is_none() {
        if let Some(program) = command.first() {
            opts.job_name = Path::new(program)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
        }
    }

    if opts.ntasks <= 0 {
        return Err(VerifyError::InvalidTaskCount(opts.ntasks));
    }
    if let Some(cpus) = opts.cpus_per_task.filter(|c| *c <= 0) {
        return Err(VerifyError::InvalidCpusPerTask(cpus));
    }
    if opts.nodes.max.is_some_and(|max| max != 0 && opts.nodes.min > max) {
        return Err(VerifyError::InvalidNodeCount(opts.nodes.to_string()));
    }

    if let (Some(mem), Some(per_cpu)) = (opts.mem, opts.mem_per_cpu) {
        if mem < per_cpu {
            tracing::info!(mem, per_cpu, "mem < mem-per-cpu - resizing mem to be equal to mem-per-cpu");
            opts.mem = Some(per_cpu);
        }
        tracing::warn!("--mem and --mem-per-cpu are mutually exclusive");
    }

    check_plane(opts)?;
    balance_counts(opts);

    if let (Some(begin), Some(deadline)) = (opts.begin, opts.deadline) {
        if deadline < begin {
            return Err(VerifyError::DeadlineBeforeBegin);
        }
    }

    let wait_param = match opts.context() {
        Context::Alloc => Some(ALLOC_WAIT_NODES),
        Context::Batch => Some(BATCH_WAIT_NODES),
        Context::Step => None,
    };
    if let Some(param) = wait_param {
        if opts.wait_all_nodes().is_none() && site.sched_param(param) {
            if let Some(slot) = opts.wait_all_nodes_mut() {
                *slot = Some(1);
            }
        }
    }

    Ok(())
}

/// Give an allocation without a command the site's default one.
fn default_command(
    opts: &mut JobOptions,
    command: &mut Vec<String>,
    site: &SiteConfig,
    env: &dyn EnvSource,
    is_last: bool,
) -> Result<(), VerifyError> {
    if !is_last || !command.is_empty() {
        return Ok(());
    }

    match opts.context() {
        Context::Alloc => {
            if opts.alloc().is_some_and(|a| a.no_shell) {
                return Ok(());
            }
            *command = match &site.default_command {
                Some(cmd) => vec![site.default_shell.clone(), "-c".to_string(), cmd.clone()],
                None => {
                    let shell = env
                        .var("SHELL")
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| site.default_shell.clone());
                    vec![shell]
                }
            };
            if opts.job_name.is_none() {
                if let Some(alloc) = opts.alloc_mut() {
                    alloc.default_job_name = true;
                }
            }
            Ok(())
        }
        Context::Step => Err(VerifyError::NoCommand),
        Context::Batch => Ok(()),
    }
}

fn check_plane(opts: &JobOptions) -> Result<(), VerifyError> {
    let Some(plane) = opts
        .distribution
        .as_ref()
        .and_then(|d| d.plane_size())
        .filter(|p| *p > 0)
    else {
        return Ok(());
    };
    let ntasks = i64::from(opts.ntasks);
    let plane = i64::from(plane);
    let min_nodes = i64::from(opts.nodes.min);
    if ntasks / plane < min_nodes && (min_nodes - 1).saturating_mul(plane) >= ntasks {
        return Err(VerifyError::PlaneDistribution);
    }
    Ok(())
}

/// Reconcile task and node counts.
fn balance_counts(opts: &mut JobOptions) {
    let fixed_nodes = opts.nodes.max.map_or(true, |max| max == 0 || max == opts.nodes.min);

    if (opts.nodes_set || opts.extra_set) && fixed_nodes && !opts.ntasks_set {
        // One task per node, then per socket, core and thread when given.
        let mut ntasks = i64::from(opts.nodes.min);
        for level in [opts.layout.sockets, opts.layout.cores, opts.layout.threads] {
            if let Some(n) = level {
                ntasks = ntasks.saturating_mul(i64::from(n));
                opts.ntasks_set = true;
            }
        }
        opts.ntasks = clamp_tasks(ntasks);
    } else if opts.nodes_set && opts.ntasks_set {
        let ntasks = u32::try_from(opts.ntasks).unwrap_or(0);
        if opts.nodes.max.is_some_and(|max| ntasks < max) {
            opts.nodes.max = Some(ntasks);
        }
        if ntasks < opts.nodes.min {
            tracing::warn!(
                ntasks,
                nodes = opts.nodes.min,
                "can't run {} processes on {} nodes, setting nnodes to {}",
                ntasks,
                opts.nodes.min,
                ntasks
            );
            opts.nodes.min = ntasks;
            opts.nodes.max = Some(ntasks);
        }
    }
}

fn clamp_tasks(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Distribution, NodeRange};
    use std::collections::HashMap;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn check(opts: &mut JobOptions, command: &mut Vec<String>) -> Result<(), VerifyError> {
        verify(opts, command, &SiteConfig::default(), &no_env(), true)
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.quiet = 1;
        opts.verbose = 1;
        assert_eq!(check(&mut opts, &mut Vec::new()), Err(VerifyError::QuietAndVerbose));
    }

    #[test]
    fn tasks_derived_from_tasks_per_node() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.nodes = NodeRange { min: 3, max: None };
        opts.ntasks_per_node = Some(4);
        check(&mut opts, &mut Vec::new()).unwrap();
        assert_eq!(opts.ntasks, 12);
        assert!(opts.ntasks_set);
    }

    #[test]
    fn mem_raised_to_mem_per_cpu() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.mem = Some(100);
        opts.mem_per_cpu = Some(512);
        check(&mut opts, &mut Vec::new()).unwrap();
        assert_eq!(opts.mem, Some(512));
    }

    #[test]
    fn alloc_falls_back_to_shell() {
        let mut opts = JobOptions::new(Context::Alloc);
        let mut command = Vec::new();
        let env = HashMap::from([("SHELL".to_string(), "/bin/zsh".to_string())]);
        verify(&mut opts, &mut command, &SiteConfig::default(), &env, true).unwrap();
        assert_eq!(command, vec!["/bin/zsh".to_string()]);
        assert_eq!(opts.job_name.as_deref(), Some("zsh"));
        assert!(opts.alloc().unwrap().default_job_name);
    }

    #[test]
    fn site_default_command_runs_through_shell() {
        let mut opts = JobOptions::new(Context::Alloc);
        let mut command = Vec::new();
        let site = SiteConfig { default_command: Some("srun --pty bash".into()), ..SiteConfig::default() };
        verify(&mut opts, &mut command, &site, &no_env(), true).unwrap();
        assert_eq!(command, vec!["/bin/sh", "-c", "srun --pty bash"]);
    }

    #[test]
    fn step_requires_command() {
        let mut opts = JobOptions::new(Context::Step);
        assert_eq!(check(&mut opts, &mut Vec::new()), Err(VerifyError::NoCommand));
    }

    #[test]
    fn plane_distribution_needs_enough_tasks() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.distribution = Some(Distribution::parse("plane=4").unwrap());
        opts.ntasks = 2;
        opts.ntasks_set = true;
        opts.nodes = NodeRange { min: 2, max: None };
        assert_eq!(check(&mut opts, &mut Vec::new()), Err(VerifyError::PlaneDistribution));
    }

    #[test]
    fn plane_check_with_huge_counts() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.distribution = Some(Distribution::parse("plane=4294967295").unwrap());
        opts.ntasks = i32::MAX;
        opts.ntasks_set = true;
        opts.nodes = NodeRange { min: u32::MAX, max: None };
        assert_eq!(check(&mut opts, &mut Vec::new()), Err(VerifyError::PlaneDistribution));
    }

    #[test]
    fn task_count_saturates_on_huge_layout() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.nodes = NodeRange { min: 100_000, max: None };
        opts.nodes_set = true;
        opts.layout.sockets = Some(u32::MAX);
        opts.layout.cores = Some(u32::MAX);
        opts.layout.threads = Some(u32::MAX);
        check(&mut opts, &mut Vec::new()).unwrap();
        assert_eq!(opts.ntasks, i32::MAX);
        assert!(opts.ntasks_set);
    }

    #[test]
    fn nodes_shrink_to_task_count() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.nodes = NodeRange { min: 4, max: Some(8) };
        opts.nodes_set = true;
        opts.ntasks = 2;
        opts.ntasks_set = true;
        check(&mut opts, &mut Vec::new()).unwrap();
        assert_eq!(opts.nodes, NodeRange { min: 2, max: Some(2) });
    }

    #[test]
    fn deadline_before_begin() {
        let mut opts = JobOptions::new(Context::Batch);
        opts.begin = Some(2_000);
        opts.deadline = Some(1_000);
        assert_eq!(check(&mut opts, &mut Vec::new()), Err(VerifyError::DeadlineBeforeBegin));
    }

    #[test]
    fn sched_params_enable_node_wait() {
        let mut opts = JobOptions::new(Context::Alloc);
        let site = SiteConfig { sched_params: vec![ALLOC_WAIT_NODES.into()], ..SiteConfig::default() };
        verify(&mut opts, &mut vec!["true".into()], &site, &no_env(), true).unwrap();
        assert_eq!(opts.wait_all_nodes(), Some(1));
    }
}

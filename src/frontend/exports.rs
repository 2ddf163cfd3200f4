//! Environment exported to the job's command, all vars in one place.

use crate::codec::{CpuFreq, MemBind, MemBindKind, ProfileFlags};
use crate::env::EnvSource;
use crate::state::JobOptions;

/// Builder for environment variables derived from resolved options.
#[derive(Debug, Clone, Default)]
pub struct ExportSet {
    vars: Vec<(String, String)>,
}

impl ExportSet {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Memory binding type, sort and verbosity.
    pub fn with_mem_bind(mut self, bind: &MemBind) -> Self {
        let value = match &bind.kind {
            Some(MemBindKind::None) => Some("none".to_string()),
            Some(MemBindKind::Rank) => Some("rank".to_string()),
            Some(MemBindKind::Local) => Some("local".to_string()),
            Some(MemBindKind::Map(list)) => Some(format!("map_mem:{}", list)),
            Some(MemBindKind::Mask(list)) => Some(format!("mask_mem:{}", list)),
            None => None,
        };
        if let Some(value) = value {
            self.vars.push(("SLURM_MEM_BIND".into(), value));
        }
        if bind.sort {
            self.vars.push(("SLURM_MEM_BIND_SORT".into(), "sort".into()));
        }
        if let Some(verbose) = bind.verbose {
            let mode = if verbose { "verbose" } else { "quiet" };
            self.vars.push(("SLURM_MEM_BIND_VERBOSE".into(), mode.into()));
        }
        self
    }

    /// Per-node, per-socket and per-core task counts.
    pub fn with_task_layout(mut self, opts: &JobOptions) -> Self {
        let counts = [
            ("SLURM_NTASKS_PER_NODE", opts.ntasks_per_node.map(i64::from)),
            ("SLURM_NTASKS_PER_SOCKET", opts.ntasks_per_socket.map(i64::from)),
            ("SLURM_NTASKS_PER_CORE", opts.ntasks_per_core.map(i64::from)),
        ];
        for (name, count) in counts {
            if let Some(count) = count {
                self.vars.push((name.into(), count.to_string()));
            }
        }
        self
    }

    pub fn with_profile(mut self, profile: Option<ProfileFlags>) -> Self {
        if let Some(profile) = profile {
            self.vars.push(("SLURM_PROFILE".into(), profile.to_string()));
        }
        self
    }

    pub fn with_cpu_freq(mut self, freq: &CpuFreq) -> Self {
        if !freq.is_unset() {
            self.vars.push(("SLURM_CPU_FREQ_REQ".into(), freq.to_string()));
        }
        self
    }

    /// Drop anything the caller's environment already defines.
    pub fn without_existing(mut self, env: &dyn EnvSource) -> Self {
        self.vars.retain(|(name, _)| env.var(name).is_none());
        self
    }

    pub fn build(self) -> Vec<(String, String)> {
        self.vars
    }
}

/// Variables to export for one resolved component.
pub fn for_options(opts: &JobOptions, env: &dyn EnvSource) -> Vec<(String, String)> {
    ExportSet::new()
        .with_mem_bind(&opts.mem_bind)
        .with_task_layout(opts)
        .with_profile(opts.profile)
        .with_cpu_freq(&opts.cpu_freq)
        .without_existing(env)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Context;
    use std::collections::HashMap;

    #[test]
    fn mem_bind_exports() {
        let bind = MemBind::parse("verbose,map_mem:0,1").unwrap();
        let vars = ExportSet::new().with_mem_bind(&bind).build();
        assert!(vars.contains(&("SLURM_MEM_BIND".into(), "map_mem:0,1".into())));
        assert!(vars.contains(&("SLURM_MEM_BIND_VERBOSE".into(), "verbose".into())));
        assert!(!vars.iter().any(|(name, _)| name == "SLURM_MEM_BIND_SORT"));
    }

    #[test]
    fn existing_vars_win() {
        let mut opts = JobOptions::new(Context::Step);
        opts.ntasks_per_node = Some(2);
        opts.ntasks_per_socket = Some(1);
        let env = HashMap::from([("SLURM_NTASKS_PER_NODE".to_string(), "8".to_string())]);

        let vars = for_options(&opts, &env);
        assert_eq!(vars, vec![("SLURM_NTASKS_PER_SOCKET".to_string(), "1".to_string())]);
    }

    #[test]
    fn unset_options_export_nothing() {
        let opts = JobOptions::new(Context::Batch);
        assert!(for_options(&opts, &HashMap::new()).is_empty());
    }
}

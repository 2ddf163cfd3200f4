//! Environment ingestion: every recognized variable in one place.

use std::collections::HashMap;
use std::fmt;

use crate::codec::{parse_int, sig_name_to_num, str_to_mbytes, time_str_to_secs, Bell, ValueError};
use crate::options::{codes, process, Context, OptCode, Pass, Registry, Source};
use crate::state::{CoreSpec, JobOptions};

/// Read access to environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Fields some variables write directly, bypassing the descriptors.
#[derive(Clone, Copy)]
pub enum FieldKind {
    Str(fn(&mut JobOptions) -> &mut Option<String>),
    Int(fn(&mut JobOptions) -> &mut Option<i32>),
    CoreSpec,
    Verbosity,
    Bell,
    NoBell,
    NoKill,
    Hint,
    MemPerGpu,
    KillCommand,
    SwitchWait,
    WaitAllNodes,
}

impl FieldKind {
    /// Write `value` into `opts`. On error nothing is changed.
    pub fn apply(self, opts: &mut JobOptions, value: &str) -> Result<(), ValueError> {
        match self {
            FieldKind::Str(field) => *field(opts) = Some(value.to_string()),
            FieldKind::Int(field) => {
                if !value.is_empty() {
                    *field(opts) = Some(parse_int("environment value", value, false)?);
                }
            }
            FieldKind::CoreSpec => {
                if !value.is_empty() {
                    let n = parse_int("core specialization", value, false)?;
                    let n = u16::try_from(n)
                        .map_err(|_| ValueError::new(format!("Invalid core specialization \"{}\"", value)))?;
                    opts.core_spec = CoreSpec::Cores(n);
                }
            }
            FieldKind::Verbosity => {
                if !value.is_empty() {
                    opts.verbose = parse_int("debug level", value, false)?;
                }
            }
            FieldKind::Bell => set_bell(opts, Bell::Always),
            FieldKind::NoBell => set_bell(opts, Bell::Never),
            FieldKind::NoKill => opts.no_kill = true,
            FieldKind::Hint => opts.hint_env = Some(value.to_string()),
            FieldKind::MemPerGpu => opts.mem_per_gpu = Some(str_to_mbytes(value)?),
            FieldKind::KillCommand => {
                let signal = sig_name_to_num(value)
                    .ok_or_else(|| ValueError::new(format!("Invalid signal name {}", value)))?;
                if let Some(alloc) = opts.alloc_mut() {
                    alloc.kill_command = Some(signal);
                }
            }
            FieldKind::SwitchWait => opts.wait4switch = Some(time_str_to_secs(value)?),
            FieldKind::WaitAllNodes => {
                if !value.is_empty() {
                    let n = parse_int("node wait", value, false)?;
                    let n = u16::try_from(n)
                        .map_err(|_| ValueError::new(format!("Invalid node wait \"{}\"", value)))?;
                    if let Some(slot) = opts.wait_all_nodes_mut() {
                        *slot = Some(n);
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Str(_) => "Str",
            FieldKind::Int(_) => "Int",
            FieldKind::CoreSpec => "CoreSpec",
            FieldKind::Verbosity => "Verbosity",
            FieldKind::Bell => "Bell",
            FieldKind::NoBell => "NoBell",
            FieldKind::NoKill => "NoKill",
            FieldKind::Hint => "Hint",
            FieldKind::MemPerGpu => "MemPerGpu",
            FieldKind::KillCommand => "KillCommand",
            FieldKind::SwitchWait => "SwitchWait",
            FieldKind::WaitAllNodes => "WaitAllNodes",
        })
    }
}

fn set_bell(opts: &mut JobOptions, bell: Bell) {
    if let Some(alloc) = opts.alloc_mut() {
        alloc.bell = bell;
    }
}

/// Where a variable's value goes.
#[derive(Debug, Clone, Copy)]
pub enum EnvTarget {
    /// Dispatched like the command-line option with this code.
    Option(OptCode),
    Field(FieldKind),
}

/// One recognized variable.
#[derive(Debug, Clone)]
pub struct EnvEntry {
    pub name: String,
    pub target: EnvTarget,
}

/// Variables shared by every front-end, without their prefix.
const COMMON_OPTIONS: &[(&str, OptCode)] = &[
    ("ACCOUNT", codes::ACCOUNT),
    ("ACCTG_FREQ", codes::ACCTG_FREQ),
    ("CLUSTER_CONSTRAINT", codes::CLUSTER_CONSTRAINT),
    ("CLUSTERS", codes::CLUSTERS),
    ("CONSTRAINT", codes::CONSTRAINT),
    ("CPU_FREQ_REQ", codes::CPU_FREQ),
    ("CPUS_PER_GPU", codes::CPUS_PER_GPU),
    ("DELAY_BOOT", codes::DELAY_BOOT),
    ("EXCLUSIVE", codes::EXCLUSIVE),
    ("GPUS", codes::GPUS),
    ("GPU_BIND", codes::GPU_BIND),
    ("GPU_FREQ", codes::GPU_FREQ),
    ("GPUS_PER_NODE", codes::GPUS_PER_NODE),
    ("GPUS_PER_SOCKET", codes::GPUS_PER_SOCKET),
    ("GPUS_PER_TASK", codes::GPUS_PER_TASK),
    ("GRES", codes::GRES),
    ("GRES_FLAGS", codes::GRES_FLAGS),
    ("MEM_BIND", codes::MEM_BIND),
    ("OVERCOMMIT", codes::OVERCOMMIT),
    ("PARTITION", codes::PARTITION),
    ("POWER", codes::POWER),
    ("PROFILE", codes::PROFILE),
    ("QOS", codes::QOS),
    ("RESERVATION", codes::RESERVATION),
    ("SIGNAL", codes::SIGNAL),
    ("SPREAD_JOB", codes::SPREAD_JOB),
    ("THREAD_SPEC", codes::THREAD_SPEC),
    ("TIMELIMIT", codes::TIME),
    ("USE_MIN_NODES", codes::USE_MIN_NODES),
    ("WCKEY", codes::WCKEY),
];

/// Field variables shared by every front-end, without their prefix.
fn common_fields() -> Vec<(&'static str, FieldKind)> {
    vec![
        ("BURST_BUFFER", FieldKind::Str(|o| &mut o.burst_buffer)),
        ("CORE_SPEC", FieldKind::CoreSpec),
        ("DEBUG", FieldKind::Verbosity),
        ("HINT", FieldKind::Hint),
        ("MEM_PER_GPU", FieldKind::MemPerGpu),
        ("NETWORK", FieldKind::Str(|o| &mut o.network)),
        ("NO_KILL", FieldKind::NoKill),
    ]
}

/// The ordered list of variables a front-end reads.
#[derive(Debug, Clone, Default)]
pub struct EnvTable {
    entries: Vec<EnvEntry>,
}

impl EnvTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, name: impl Into<String>, code: OptCode) -> Self {
        self.entries.push(EnvEntry { name: name.into(), target: EnvTarget::Option(code) });
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.entries.push(EnvEntry { name: name.into(), target: EnvTarget::Field(kind) });
        self
    }

    /// Table for `ctx`: the common variables under its prefix, then the
    /// front-end's own, then names shared across front-ends.
    pub fn for_context(ctx: Context) -> Self {
        let prefix = ctx.env_prefix();
        let mut table = Self::new();
        for (suffix, code) in COMMON_OPTIONS {
            table = table.with_option(format!("{}{}", prefix, suffix), *code);
        }
        for (suffix, kind) in common_fields() {
            table = table.with_field(format!("{}{}", prefix, suffix), kind);
        }

        match ctx {
            Context::Alloc => table
                .with_field("SALLOC_BELL", FieldKind::Bell)
                .with_field("SALLOC_NO_BELL", FieldKind::NoBell)
                .with_field("SALLOC_KILL_CMD", FieldKind::KillCommand)
                .with_field("SALLOC_WAIT_ALL_NODES", FieldKind::WaitAllNodes)
                .with_field("SALLOC_REQ_SWITCH", FieldKind::Int(|o| &mut o.req_switch))
                .with_field("SALLOC_WAIT4SWITCH", FieldKind::SwitchWait)
                .with_option("SALLOC_IMMEDIATE", codes::IMMEDIATE)
                .with_option("SLURM_CLUSTERS", codes::CLUSTERS)
                .with_field("SLURM_HINT", FieldKind::Hint),
            Context::Batch => table
                .with_option("SBATCH_REQ_SWITCH", codes::SWITCH_REQ)
                .with_option("SBATCH_WAIT4SWITCH", codes::SWITCH_WAIT)
                .with_option("SBATCH_WAIT_ALL_NODES", codes::WAIT_ALL_NODES)
                .with_option("SBATCH_GET_USER_ENV", codes::GET_USER_ENV)
                .with_option("SLURM_CLUSTERS", codes::CLUSTERS)
                .with_field("SLURM_HINT", FieldKind::Hint),
            Context::Step => table
                .with_option("SLURM_REQ_SWITCH", codes::SWITCH_REQ)
                .with_option("SLURM_WAIT4SWITCH", codes::SWITCH_WAIT)
                .with_option("SLURM_IMMEDIATE", codes::IMMEDIATE),
        }
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }
}

/// Apply every variable in `table` that `env` defines, in table order.
///
/// Invalid values are logged and skipped; the affected field keeps its
/// previous value.
pub fn ingest(table: &EnvTable, env: &dyn EnvSource, registry: &mut Registry, opts: &mut JobOptions) {
    for entry in table.entries() {
        let Some(value) = env.var(&entry.name) else {
            continue;
        };
        tracing::debug!(var = %entry.name, value = %value, "processing environment variable");

        let result = match entry.target {
            EnvTarget::Option(code) => {
                process(registry, opts, code, Some(&value), Source::Environment, Pass::Normal)
                    .map_err(|e| e.to_string())
            }
            EnvTarget::Field(kind) => kind.apply(opts, &value).map_err(|e| e.to_string()),
        };
        if let Err(error) = result {
            tracing::warn!(var = %entry.name, value = %value, %error, "invalid environment value, ignoring");
        }
    }
}

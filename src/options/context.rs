//! Front-end contexts and setter resolution.

use std::fmt;

use serde::Serialize;

use crate::options::descriptor::{Behavior, OptionDescriptor, Setter};

/// The front-end program whose option table is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    /// Interactive allocation.
    Alloc,
    /// Batch submission.
    Batch,
    /// Step launch.
    Step,
}

impl Context {
    pub const ALL: [Context; 3] = [Context::Alloc, Context::Batch, Context::Step];

    /// Prefix of the environment variables read by this front-end.
    pub fn env_prefix(self) -> &'static str {
        match self {
            Context::Alloc => "SALLOC_",
            Context::Batch => "SBATCH_",
            Context::Step => "SLURM_",
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Context::Alloc => "jobopt alloc",
            Context::Batch => "jobopt batch",
            Context::Step => "jobopt step",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Context::Alloc => "alloc",
            Context::Batch => "batch",
            Context::Step => "step",
        })
    }
}

/// Pick the setter `descriptor` uses in `ctx`.
///
/// A generic setter always wins; otherwise the per-context entry for `ctx`,
/// or `None` when the option does not exist in this front-end.
pub fn select_setter(descriptor: &OptionDescriptor, ctx: Context) -> Option<&Setter> {
    match descriptor.behavior() {
        Behavior::Generic(setter) => Some(setter),
        Behavior::PerContext(setters) => setters.get(ctx),
    }
}

/// Whether `descriptor` can be applied at all in `ctx`.
pub fn is_reachable(descriptor: &OptionDescriptor, ctx: Context) -> bool {
    select_setter(descriptor, ctx).is_some()
}

//! Dispatch engine: route one (code, value) pair to its descriptor.

use thiserror::Error;

use crate::codec::env_truthy;
use crate::options::context::{select_setter, Context};
use crate::options::descriptor::{FlagArity, OptCode};
use crate::options::registry::Registry;
use crate::state::JobOptions;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    CommandLine,
    Environment,
}

/// Command-line scan in progress. Only batch submission has two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Early,
    Normal,
}

/// Errors produced while dispatching an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// No descriptor with this code is reachable in the active context.
    #[error("unrecognized option {code}")]
    UnknownOption { code: OptCode },

    /// The setter rejected the value.
    #[error("{message}")]
    InvalidValue { option: String, message: String },
}

/// Apply `value` for `code` to `opts`.
///
/// Rules, in order:
/// 1. unknown or unreachable codes fail with [`OptionError::UnknownOption`];
/// 2. batch command-line values are filtered by pass (early-pass options
///    only in [`Pass::Early`], all others only in [`Pass::Normal`]);
/// 3. a value for a no-value option is read as a boolean: truthy calls the
///    setter without a value, falsy resets the option and clears its flags;
///    an empty optional value counts as absent;
/// 4. setter errors become [`OptionError::InvalidValue`].
pub fn process(
    registry: &mut Registry,
    opts: &mut JobOptions,
    code: OptCode,
    value: Option<&str>,
    source: Source,
    pass: Pass,
) -> Result<(), OptionError> {
    let ctx = opts.context();
    let index = registry
        .position(code, ctx)
        .ok_or(OptionError::UnknownOption { code })?;
    let Some(descriptor) = registry.get(index) else {
        return Err(OptionError::UnknownOption { code });
    };

    if ctx == Context::Batch && source == Source::CommandLine {
        let deferred = match pass {
            Pass::Normal => descriptor.early_pass(),
            Pass::Early => !descriptor.early_pass(),
        };
        if deferred {
            return Ok(());
        }
    }

    let mut setarg = value;
    if let Some(raw) = value {
        match descriptor.arity() {
            FlagArity::NoValue => {
                if !env_truthy(raw) {
                    tracing::debug!(option = descriptor.display_name(), value = raw, "false flag value, resetting");
                    descriptor.reset(opts);
                    if let Some(d) = registry.get_mut(index) {
                        d.explicitly_set = false;
                        d.set_by_env = false;
                    }
                    return Ok(());
                }
                setarg = None;
            }
            FlagArity::OptionalValue if raw.is_empty() => setarg = None,
            _ => {}
        }
    }

    let Some(setter) = select_setter(descriptor, ctx) else {
        return Err(OptionError::UnknownOption { code });
    };
    if let Err(e) = setter(opts, setarg) {
        return Err(OptionError::InvalidValue {
            option: descriptor.display_name().to_string(),
            message: e.to_string(),
        });
    }

    tracing::trace!(option = descriptor.display_name(), ?source, "option set");
    if let Some(d) = registry.get_mut(index) {
        d.explicitly_set = true;
        d.set_by_env = source == Source::Environment;
    }
    Ok(())
}

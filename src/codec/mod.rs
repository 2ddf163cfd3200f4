//! Value codecs: string to typed value conversions called from option setters.
//!
//! Every parser is a pure function returning `Result<T, ValueError>`; the
//! dispatch engine decides whether a failure is fatal (command line) or
//! only logged (environment).

mod duration;
mod flags;
mod number;
mod signal;
mod size;
mod timestamp;

use thiserror::Error;

pub use duration::{mins_to_time_str, secs_to_time_str, time_str_to_mins, time_str_to_secs, INFINITE};
pub use flags::{
    parse_acctg_freq, Bell, CpuFreq, DistKind, Distribution, FreqValue, GresBinding, Governor,
    Hint, MailType, MemBind, MemBindKind, NodeRange, PowerFlags, Priority, ProfileFlags,
    SharedMode, SocketCoreThread, Switches, UserEnv, UserEnvMode,
};
pub use number::{env_truthy, parse_full_int, parse_int};
pub use signal::{sig_name_to_num, sig_num_to_name, WarnSignal};
pub use size::{mbytes_to_str, str_to_mbytes};
pub use timestamp::{make_time_str, parse_time, parse_time_at};

/// A value rejected by a codec or a setter's own validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValueError(pub String);

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

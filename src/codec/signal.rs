//! Signal names and `--signal` specifications.

use std::fmt;

use serde::Serialize;

use super::ValueError;

const SIGNALS: &[(&str, i32)] = &[
    ("HUP", libc::SIGHUP),
    ("INT", libc::SIGINT),
    ("QUIT", libc::SIGQUIT),
    ("ABRT", libc::SIGABRT),
    ("KILL", libc::SIGKILL),
    ("ALRM", libc::SIGALRM),
    ("TERM", libc::SIGTERM),
    ("USR1", libc::SIGUSR1),
    ("USR2", libc::SIGUSR2),
    ("URG", libc::SIGURG),
    ("CONT", libc::SIGCONT),
    ("STOP", libc::SIGSTOP),
    ("TSTP", libc::SIGTSTP),
    ("TTIN", libc::SIGTTIN),
    ("TTOU", libc::SIGTTOU),
    ("XCPU", libc::SIGXCPU),
];

/// Default lead time, in seconds, for a warning signal.
const DEFAULT_WARN_TIME: u32 = 60;
/// Upper bound on the warning lead time.
const MAX_WARN_TIME: u32 = 0xffff;

/// Resolve a signal by name (`TERM`, `SIGTERM`, any case) or number.
pub fn sig_name_to_num(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i32>() {
        return (n > 0 && n < 65).then_some(n);
    }
    let upper = s.to_ascii_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    SIGNALS.iter().find(|(n, _)| *n == name).map(|(_, num)| *num)
}

/// Short signal name without the `SIG` prefix, or the number itself.
pub fn sig_num_to_name(num: i32) -> String {
    SIGNALS
        .iter()
        .find(|(_, n)| *n == num)
        .map(|(name, _)| (*name).to_string())
        .unwrap_or_else(|| num.to_string())
}

/// A signal delivered ahead of the time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarnSignal {
    pub signal: i32,
    /// Seconds before the time limit.
    pub time: u32,
    /// Only the batch shell receives the signal.
    pub batch_only: bool,
    /// Also signal when a reservation ends.
    pub reservation: bool,
}

impl WarnSignal {
    /// Parse `[R][B]:sig[@time]`.
    pub fn parse(s: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::new(format!("Invalid --signal specification \"{}\"", s));

        let (flags, rest) = match s.split_once(':') {
            Some((flags, rest)) => (flags, rest),
            None => ("", s),
        };
        let mut batch_only = false;
        let mut reservation = false;
        for c in flags.chars() {
            match c.to_ascii_uppercase() {
                'B' => batch_only = true,
                'R' => reservation = true,
                _ => return Err(invalid()),
            }
        }

        let (sig, time) = match rest.split_once('@') {
            Some((sig, time)) => {
                let time: u32 = time.parse().map_err(|_| invalid())?;
                if time > MAX_WARN_TIME {
                    return Err(invalid());
                }
                (sig, time)
            }
            None => (rest, DEFAULT_WARN_TIME),
        };

        let signal = sig_name_to_num(sig).ok_or_else(invalid)?;
        Ok(Self { signal, time, batch_only, reservation })
    }
}

impl fmt::Display for WarnSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reservation || self.batch_only {
            if self.reservation {
                f.write_str("R")?;
            }
            if self.batch_only {
                f.write_str("B")?;
            }
            f.write_str(":")?;
        }
        write!(f, "{}@{}", sig_num_to_name(self.signal), self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_numbers() {
        assert_eq!(sig_name_to_num("TERM"), Some(libc::SIGTERM));
        assert_eq!(sig_name_to_num("sigusr1"), Some(libc::SIGUSR1));
        assert_eq!(sig_name_to_num("9"), Some(9));
        assert_eq!(sig_name_to_num("BOGUS"), None);
        assert_eq!(sig_num_to_name(libc::SIGKILL), "KILL");
    }

    #[test]
    fn warn_signal_forms() {
        let plain = WarnSignal::parse("USR1").unwrap();
        assert_eq!(plain.time, 60);
        assert!(!plain.batch_only);

        let batch = WarnSignal::parse("B:TERM@120").unwrap();
        assert_eq!(batch.signal, libc::SIGTERM);
        assert_eq!(batch.time, 120);
        assert!(batch.batch_only);
        assert_eq!(batch.to_string(), "B:TERM@120");

        assert!(WarnSignal::parse("X:TERM").is_err());
        assert!(WarnSignal::parse("TERM@soon").is_err());
    }
}

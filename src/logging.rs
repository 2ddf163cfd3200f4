use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var naming a log file; logs go to stderr when unset.
pub const LOG_ENV: &str = "JOBOPT_LOG";

/// Filter directive for a `-v` count: 0 warn, 1 info, 2 debug, more trace.
pub fn level_for(verbosity: i32) -> &'static str {
    match verbosity {
        i32::MIN..=0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing. `RUST_LOG` overrides the verbosity-derived level.
///
/// With `JOBOPT_LOG` set, output goes to `{path}.{timestamp}.{pid}` so
/// concurrent runs don't share a file.
pub fn init_tracing(verbosity: i32) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let log_file = std::env::var(LOG_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .and_then(|path| open_log_file(&path));

    let Some(file) = log_file else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init();
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry().with(filter).with(file_layer).try_init();
}

/// Create `{path}.{timestamp}.{pid}`. On failure logging stays on stderr.
fn open_log_file(path: &str) -> Option<std::fs::File> {
    let pid = std::process::id();
    let timestamp = chrono::Utc::now().timestamp();
    let unique_path = format!("{}.{}.{}", path, timestamp, pid);

    match std::fs::File::create(&unique_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to create log file {}: {}", unique_path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(7), "trace");
    }

    #[test]
    fn unwritable_log_path_yields_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("jobopt.log");
        assert!(open_log_file(&missing.to_string_lossy()).is_none());

        let ok = dir.path().join("jobopt.log");
        assert!(open_log_file(&ok.to_string_lossy()).is_some());
    }
}

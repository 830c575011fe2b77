//! File logging. The terminal is in raw mode on the alternate screen, so
//! nothing is written to stdout or stderr.

use std::{fs, path::Path, sync::Mutex};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured level.
pub(crate) fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber writing to `log_path`. Returns false, and
/// logs nowhere, when the file cannot be created.
pub(crate) fn init_logging(log_path: &Path, level: &str) -> bool {
    if let Some(dir) = log_path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
    }
    let Ok(file) = fs::File::create(log_path) else {
        return false;
    };

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_parses() {
        let filter = EnvFilter::new("warn,heliorama=debug");
        let s = filter.to_string();
        assert!(s.contains("heliorama=debug"));
        assert!(s.contains("warn"));
    }

    #[test]
    fn unwritable_path_disables_logging() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file.
        assert!(!init_logging(dir.path(), "info"));
    }
}

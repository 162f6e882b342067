//! File-based logging. The terminal belongs to the UI, so nothing is written
//! to stdout or stderr once the screen is up.
//!
//! `HOURGLASS_LOG` overrides the filter (e.g. `HOURGLASS_LOG=hourglass=trace`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber writing to `log_path`.
///
/// Returns the appender guard, which must live until exit so buffered lines
/// get flushed. Returns `None` (logging disabled) if the directory cannot be
/// created.
pub fn init(log_path: &Path, level: &str) -> Option<WorkerGuard> {
    let dir = log_dir(log_path);
    let file_name = log_path.file_name()?;

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {:?}: {}, logging disabled", dir, e);
        return None;
    }

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("HOURGLASS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("hourglass={}", level)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .init();

    tracing::info!(log_file = ?log_path, "Logging initialized");
    Some(guard)
}

/// Directory holding `log_path`; a bare file name lives in the working directory
fn log_dir(log_path: &Path) -> &Path {
    log_path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_logs_to_working_directory() {
        assert_eq!(log_dir(Path::new("hourglass.log")), Path::new("."));
    }

    #[test]
    fn nested_path_keeps_its_directory() {
        assert_eq!(
            log_dir(Path::new("/tmp/hourglass/hourglass.log")),
            Path::new("/tmp/hourglass")
        );
        assert_eq!(log_dir(Path::new("logs/run.log")), Path::new("logs"));
    }
}

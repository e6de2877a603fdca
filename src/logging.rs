//! Tracing setup for the catalog service.
//!
//! Events are written to stdout in compact form and mirrored to a log file. The file is
//! `MEDICINE_API_LOG_FILE` when set, `logs/medicine-api.log` otherwise. File output goes
//! through a non-blocking writer whose guard lives for the rest of the process.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_VAR: &str = "MEDICINE_API_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "logs/medicine-api.log";

/// Install the global subscriber.
///
/// Loads `.env` first so `RUST_LOG` and `MEDICINE_API_LOG_FILE` may come from it.
/// Filtering honours `RUST_LOG` and defaults to `info`. Calling this twice is harmless: the
/// second subscriber is discarded.
pub fn init_tracing() {
    crate::config::load_dotenv();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let log_path = configured_log_path();

    let file_layer = open_log_writer(&log_path).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(log_file = %log_path.display(), "Tracing initialized");
    }
}

/// Log file selected by the current process environment.
fn configured_log_path() -> PathBuf {
    resolve_log_path(std::env::var(LOG_FILE_VAR).ok())
}

/// Pick the log file from the environment override, ignoring blank values.
fn resolve_log_path(override_path: Option<String>) -> PathBuf {
    override_path
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Open `path` for appending behind a non-blocking writer.
///
/// Returns `None` when the parent directory cannot be created or the path has no file name.
fn open_log_writer(path: &Path) -> Option<NonBlocking> {
    let file_name = path.file_name()?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(err) = std::fs::create_dir_all(directory) {
        eprintln!("Failed to create log directory {}: {err}", directory.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_path_is_used_without_override() {
        assert_eq!(resolve_log_path(None), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(
            resolve_log_path(Some("   ".into())),
            PathBuf::from(DEFAULT_LOG_FILE)
        );
    }

    #[test]
    fn override_wins() {
        assert_eq!(
            resolve_log_path(Some("/var/log/medicine.log".into())),
            PathBuf::from("/var/log/medicine.log")
        );
    }

    #[test]
    fn env_file_values_reach_the_log_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_file = dir.path().join("custom.log");
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            format!("{LOG_FILE_VAR}={}\n", log_file.display()),
        )
        .expect("write env file");

        dotenvy::from_path_override(&env_file).expect("load env file");
        assert_eq!(configured_log_path(), log_file);
    }

    #[test]
    fn writer_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("api.log");
        assert!(open_log_writer(&path).is_some());
        assert!(dir.path().join("nested").is_dir());
    }
}

//! File logging bootstrap.
//!
//! The terminal belongs to the UI, so log records go to rotated files in the
//! data directory instead of stderr. Events are written as
//! `event=<name> module=<module> status=<status>` followed by details.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "student-records";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Start the file logger. Calling it again with the same level and
/// directory is a no-op; anything else is rejected because the global logger
/// can only be installed once per process.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        fs::create_dir_all(log_dir).with_context(|| {
            format!("failed to create log directory `{}`", log_dir.display())
        })?;

        let logger = Logger::try_with_str(level)
            .with_context(|| format!("invalid log level `{level}`"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("failed to start logger")?;

        info!(
            "event=app_start module=logging status=ok version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level: level.to_string(),
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    if state.log_dir != log_dir {
        return Err(anyhow!(
            "logging already initialized at `{}`",
            state.log_dir.display()
        ));
    }
    if state.level != level {
        return Err(anyhow!(
            "logging already initialized with level `{}`",
            state.level
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    #[test]
    fn init_is_idempotent_for_the_same_target_only() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let log_dir = first.path().join("logs");

        init_logging("info", &log_dir).unwrap();
        init_logging("info", &log_dir).unwrap();
        assert!(log_dir.is_dir());

        let err = init_logging("info", second.path()).unwrap_err();
        assert!(err.to_string().contains("already initialized at"));

        let err = init_logging("debug", &log_dir).unwrap_err();
        assert!(err.to_string().contains("already initialized with level"));
    }
}

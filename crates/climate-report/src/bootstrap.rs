use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use climate_core::error::ReportError;
use climate_data::reader;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.climate-report/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.climate-report/`
/// - `~/.climate-report/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let report_dir = home.join(".climate-report");
    std::fs::create_dir_all(&report_dir)?;
    std::fs::create_dir_all(report_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
///
/// The `log_file` parameter is accepted for forward-compatibility but file
/// logging is not yet wired – all output currently goes to stderr.
pub fn setup_logging(log_level: &str, _log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // Map conventional log-level names to tracing directives (lowercase).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" | "CRITICAL" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Dataset-root resolution ────────────────────────────────────────────────────

/// Verify that `data_path` exists and carries the expected dataset layout.
///
/// When files are missing, logs what IS present under the root before
/// failing, so a mislaid dataset is diagnosable from the error output.
pub fn resolve_data_root(data_path: &Path) -> Result<PathBuf, ReportError> {
    if !data_path.is_dir() {
        return Err(ReportError::DataRootNotFound(data_path.to_path_buf()));
    }

    let missing: Vec<&str> = reader::REQUIRED_FILES
        .iter()
        .filter(|rel| !data_path.join(rel).is_file())
        .copied()
        .collect();

    if !missing.is_empty() {
        let present = reader::find_dataset_files(data_path);
        tracing::warn!(
            "Dataset root {} is missing {:?}; found instead: {:?}",
            data_path.display(),
            missing,
            present
        );
        return Err(ReportError::DataRootNotFound(data_path.to_path_buf()));
    }

    Ok(data_path.to_path_buf())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

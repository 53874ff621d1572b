/// File logging. The terminal belongs to the TUI, so nothing is logged there.
use std::path::Path;

use anyhow::Result;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const LOG_FILE_BASENAME: &str = "loopos";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts rotating file logs in `log_dir`. Keep the handle alive for the
/// lifetime of the program so buffered lines get flushed.
pub fn init(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)?;
    let handle = Logger::try_with_env_or_str(level)?
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
        .start()?;
    log::info!(
        "loopos {} started on {}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );
    Ok(handle)
}

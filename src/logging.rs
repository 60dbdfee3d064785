//! Log initialization
//!
//! The interactive session owns the terminal in raw mode, so log output
//! goes to a file instead of stderr. `RUST_LOG` controls the filter.

use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::error::Result;

/// Default log file path (same directory as the executable).
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rolodex.log")
}

/// Initialize the global logger, writing to `log_file` (started fresh each
/// run). Safe to call more than once; later calls are no-ops.
pub fn init(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file.unwrap_or_else(default_log_path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();

    Ok(())
}

//! Logging utilities for the reconciler

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique log file path from the PID and timestamp
pub fn get_log_file_path(log_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let pid = std::process::id();

    std::fs::create_dir_all(log_dir)?;

    let log_filename = format!("processing_{pid}_{timestamp}.log");
    Ok(log_dir.join(log_filename))
}

/// Create log file with proper options
pub fn create_log_file(log_dir: &Path) -> Result<std::fs::File, Box<dyn std::error::Error>> {
    let log_path = get_log_file_path(log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    println!("Log file created: {}", log_path.display());

    Ok(log_file)
}

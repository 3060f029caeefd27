//! Constants for the reconciler

/// Default profile file, relative to the working directory
pub const CONFIG_FILE: &str = "reconcile.toml";

/// Default directory for per-run log files
pub const LOG_DIR: &str = "logs";

/// Default durable store of processed batch ids
pub const TRACKER_FILE: &str = "processed_files.log";

/// Extension given to every written batch
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Extensions decoded as spreadsheet workbooks; everything else is read as CSV
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Literal indicator values written to output
pub const INDICATOR_TRUE: &str = "TRUE";
pub const INDICATOR_FALSE: &str = "FALSE";

/// Default column names
pub const DEFAULT_REFERENCE_COLUMN: &str = "global_id";
pub const DEFAULT_SUBJECT_COLUMN: &str = "PersNo";
pub const DEFAULT_INDICATOR_COLUMN: &str = "indicator";

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Notification subjects
pub const SUCCESS_SUBJECT: &str = "Processing Completed Successfully";
pub const FAILURE_SUBJECT: &str = "Processing Failed";

/// Tabular decode/encode error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("Workbook has no worksheet")]
    NoWorksheet,
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid table format: {0}")]
    InvalidFormat(String),
}

impl TableError {
    /// Create a new MissingColumn error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Create a new InvalidFormat error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

/// Result type alias for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Unified error type for the reconciler
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Tabular errors
    #[error("Table error: {0}")]
    Table(#[from] crate::error::TableError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::error::ConfigError),

    // Reference dataset errors
    #[error("Reference dataset {path:?} could not be loaded: {source}")]
    Reference {
        path: PathBuf,
        source: crate::error::TableError,
    },

    #[error("Reference dataset {0:?} has no rows")]
    EmptyReference(PathBuf),

    // Bookkeeping errors
    #[error("Processed-set store {path:?}: {source}")]
    Tracker {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Batch id cannot be stored: {0:?}")]
    InvalidBatchId(String),

    #[error("Batch root {0:?} is not a directory")]
    BatchRoot(PathBuf),

    // Pipeline errors
    #[error("Missing required input '{required}' for node '{node}'")]
    MissingInput { node: String, required: String },

    #[error("Missing required output '{required}' for node '{node}'")]
    MissingOutput { node: String, required: String },

    #[error("Pipeline configuration error: {0}")]
    Pipeline(String),

    #[error("{node}: {source}")]
    Stage {
        node: String,
        source: Box<ReconcileError>,
    },

    // Notification errors
    #[error("Notification error: {0}")]
    Notify(String),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

impl ReconcileError {
    /// Create a pipeline configuration error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Create a notification error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Wrap an error raised by a pipeline node
    pub fn stage(node: impl Into<String>, source: ReconcileError) -> Self {
        Self::Stage {
            node: node.into(),
            source: Box::new(source),
        }
    }

    /// Name of the node that failed, if the error came out of a pipeline
    pub fn stage_name(&self) -> Option<&str> {
        match self {
            Self::Stage { node, .. } => Some(node),
            _ => None,
        }
    }
}

// Conversion from String for convenience
impl From<String> for ReconcileError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

// Conversion from &str for convenience
impl From<&str> for ReconcileError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

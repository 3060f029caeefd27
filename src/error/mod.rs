/// Centralized error handling for the reconciler
pub mod config;
pub mod reconcile;
pub mod table;

pub use config::{ConfigError, ConfigResult};
pub use reconcile::{ReconcileError, Result};
pub use table::{TableError, TableResult};

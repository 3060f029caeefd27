/// Type-safe keys for PipeMap
use crate::config::ColumnMapping;
use crate::correlate::{ReferenceKeySet, VerificationResult};
use crate::table::Table;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

/// A type-safe key for PipeMap that enforces compile-time type checking
pub struct TypedKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> TypedKey<T> {
    /// Create a new typed key with a static name
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// Get the key name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> {}

/// Input batch file; its path string is the batch id
pub const BATCH_PATH: TypedKey<PathBuf> = TypedKey::new("batch_path");

/// Directory verified batches are written to
pub const OUTPUT_DIR: TypedKey<PathBuf> = TypedKey::new("output_dir");

/// Column names for subject and indicator
pub const COLUMNS: TypedKey<ColumnMapping> = TypedKey::new("columns");

/// Reference keys shared by every batch of a run
pub const REFERENCE_KEYS: TypedKey<Arc<ReferenceKeySet>> = TypedKey::new("reference_keys");

/// Decoded batch, tagged once the correlator has run
pub const BATCH_TABLE: TypedKey<Table> = TypedKey::new("batch_table");

/// Completeness gate result
pub const VERIFICATION: TypedKey<VerificationResult> = TypedKey::new("verification");

/// Written output file; None when the gate held the batch back
pub const OUTPUT_FILE: TypedKey<Option<PathBuf>> = TypedKey::new("output_file");

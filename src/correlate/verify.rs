//! Completeness gate: every reference key must be matched somewhere in the batch

use super::key::ReferenceKeySet;
use crate::error::TableResult;
use crate::table::Table;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub complete: bool,
    /// Reference keys no subject matched, in reference order
    pub missing: Vec<String>,
}

/// Check the batch against the whole reference population, not only the rows it tagged
pub fn verify(
    table: &Table,
    subject_column: &str,
    keys: &ReferenceKeySet,
) -> TableResult<VerificationResult> {
    let subjects: HashSet<&str> = table.column(subject_column)?.collect();

    let missing: Vec<String> = keys
        .iter()
        .filter(|key| !subjects.contains(key))
        .map(str::to_string)
        .collect();

    Ok(VerificationResult {
        complete: missing.is_empty(),
        missing,
    })
}

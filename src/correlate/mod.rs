//! Membership correlation between batch subjects and reference keys

pub mod key;
pub mod verify;

pub use key::{ReferenceKeySet, derive_key};
pub use verify::{VerificationResult, verify};

use crate::config::constants::{INDICATOR_FALSE, INDICATOR_TRUE};
use crate::error::TableResult;
use crate::table::Table;

/// Per-record membership tag. Written out as the literal text `TRUE` / `FALSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    True,
    False,
}

impl Indicator {
    pub fn as_str(self) -> &'static str {
        match self {
            Indicator::True => INDICATOR_TRUE,
            Indicator::False => INDICATOR_FALSE,
        }
    }
}

impl From<bool> for Indicator {
    fn from(found: bool) -> Self {
        if found { Indicator::True } else { Indicator::False }
    }
}

/// Tag every row by exact-text membership of its subject identifier.
/// Rows keep their order; the indicator column is appended or overwritten.
pub fn correlate(
    mut table: Table,
    subject_column: &str,
    indicator_column: &str,
    keys: &ReferenceKeySet,
) -> TableResult<Table> {
    let indicators: Vec<String> = table
        .column(subject_column)?
        .map(|subject| Indicator::from(keys.contains(subject)).as_str().to_string())
        .collect();

    table.set_column(indicator_column, indicators)?;
    Ok(table)
}

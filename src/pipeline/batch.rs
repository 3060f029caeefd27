//! One input batch: decode → correlate → verify → write if complete

use super::keys::{
    BATCH_PATH, COLUMNS, OUTPUT_DIR, OUTPUT_FILE, REFERENCE_KEYS, VERIFICATION,
};
use super::nodes::{CorrelatorNode, OutputWriterNode, TableReaderNode, VerifierNode};
use super::{PipeMap, Pipeline};
use crate::config::ColumnMapping;
use crate::correlate::ReferenceKeySet;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

/// Result of one processing attempt. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Verified and written to this file
    Written(PathBuf),
    /// Completeness gate failed; nothing written
    Incomplete { missing: Vec<String> },
    /// Decode, correlate or encode failed
    Failed {
        stage: Option<String>,
        reason: String,
    },
}

pub struct BatchProcessor {
    pipeline: Pipeline,
    columns: ColumnMapping,
}

impl BatchProcessor {
    pub fn new(columns: ColumnMapping) -> Result<Self> {
        let pipeline = Pipeline::new("batch")
            .with_external_inputs(
                [BATCH_PATH.name(), OUTPUT_DIR.name(), COLUMNS.name(), REFERENCE_KEYS.name()]
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            )
            .add_node(Box::new(TableReaderNode))?
            .add_node(Box::new(CorrelatorNode))?
            .add_node(Box::new(VerifierNode))?
            .add_node(Box::new(OutputWriterNode))?;

        Ok(Self::with_pipeline(pipeline, columns))
    }

    /// Use a custom node pipeline. It receives the batch path, output dir,
    /// columns and reference keys, and must produce the verification result
    /// and the output file.
    pub fn with_pipeline(pipeline: Pipeline, columns: ColumnMapping) -> Self {
        Self { pipeline, columns }
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Process one batch. Errors are logged and returned as `Failed`, never raised.
    pub async fn process(
        &self,
        batch: &Path,
        keys: &Arc<ReferenceKeySet>,
        output_dir: &Path,
    ) -> BatchOutcome {
        let mut data = PipeMap::new();
        data.insert_typed(BATCH_PATH, batch.to_path_buf());
        data.insert_typed(OUTPUT_DIR, output_dir.to_path_buf());
        data.insert_typed(COLUMNS, self.columns.clone());
        data.insert_typed(REFERENCE_KEYS, Arc::clone(keys));

        let mut data = match self.pipeline.execute(data).await {
            Ok(data) => data,
            Err(e) => {
                error!("Error processing file {:?}: {}", batch, e);
                return BatchOutcome::Failed {
                    stage: e.stage_name().map(str::to_string),
                    reason: e.to_string(),
                };
            }
        };

        match (data.take_typed(OUTPUT_FILE), data.take_typed(VERIFICATION)) {
            (Some(Some(path)), _) => BatchOutcome::Written(path),
            (Some(None), Some(verification)) if !verification.complete => {
                warn!(
                    "File {:?} did not contain all reference keys and was not written to output.",
                    batch
                );
                BatchOutcome::Incomplete {
                    missing: verification.missing,
                }
            }
            _ => {
                error!("Pipeline for {:?} finished without an output decision", batch);
                BatchOutcome::Failed {
                    stage: None,
                    reason: "pipeline produced no output decision".to_string(),
                }
            }
        }
    }
}

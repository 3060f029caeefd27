//! Incremental run over every batch under a root directory

use super::batch::{BatchOutcome, BatchProcessor};
use crate::config::Profile;
use crate::correlate::ReferenceKeySet;
use crate::error::{ReconcileError, Result};
use crate::table::read_table;
use crate::tracker::ProcessedSetTracker;
use crate::util::file::{ExtensionFilter, FileCollector};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};

/// Run-level counts, reported once the enumeration is exhausted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Reference keys derived for this run
    pub reference_keys: usize,
    /// Batch files found under the root
    pub discovered: usize,
    /// Batches already in the processed set
    pub skipped: usize,
    pub written: usize,
    pub incomplete: usize,
    pub failed: usize,
    /// Batches that could not be recorded as processed
    pub unrecorded: usize,
}

impl RunSummary {
    /// Batches attempted in this run
    pub fn attempted(&self) -> usize {
        self.written + self.incomplete + self.failed
    }

    fn tally(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Written(_) => self.written += 1,
            BatchOutcome::Incomplete { .. } => self.incomplete += 1,
            BatchOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} batches found, {} already processed, {} written, {} incomplete, {} failed",
            self.discovered, self.skipped, self.written, self.incomplete, self.failed
        )?;
        if self.unrecorded > 0 {
            write!(f, ", {} not recorded as processed", self.unrecorded)?;
        }
        Ok(())
    }
}

/// Batch enumeration options
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Sort batches lexically instead of using traversal order
    pub sort_batches: bool,
    /// Restrict enumeration to these extensions; empty means every file
    pub batch_extensions: Vec<String>,
}

pub struct PipelineRunner {
    processor: BatchProcessor,
    options: RunOptions,
}

impl PipelineRunner {
    pub fn new(processor: BatchProcessor, options: RunOptions) -> Self {
        Self { processor, options }
    }

    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let processor = BatchProcessor::new(profile.columns.clone())?;
        let options = RunOptions {
            sort_batches: profile.sort_batches,
            batch_extensions: profile.batch_extensions.clone(),
        };
        Ok(Self::new(processor, options))
    }

    /// Decode the reference dataset and derive its key set
    pub async fn load_reference(&self, path: &Path) -> Result<Arc<ReferenceKeySet>> {
        let column = &self.processor.columns().reference;
        let reference_error = |source| ReconcileError::Reference {
            path: path.to_path_buf(),
            source,
        };

        let table = read_table(path).await.map_err(reference_error)?;
        if table.is_empty() {
            return Err(ReconcileError::EmptyReference(path.to_path_buf()));
        }

        let keys = ReferenceKeySet::from_identifiers(table.column(column).map_err(reference_error)?);
        info!(
            "Derived {} reference keys from {} rows of {:?}",
            keys.len(),
            table.len(),
            path
        );
        Ok(Arc::new(keys))
    }

    /// Every batch file under the root, in traversal order unless sorting is enabled
    pub async fn enumerate(&self, batch_root: &Path) -> Result<Vec<PathBuf>> {
        let is_dir = tokio::fs::metadata(batch_root)
            .await
            .is_ok_and(|metadata| metadata.is_dir());
        if !is_dir {
            return Err(ReconcileError::BatchRoot(batch_root.to_path_buf()));
        }

        let collector = FileCollector::new(ExtensionFilter::new(&self.options.batch_extensions));
        let mut batches = collector.collect(batch_root).await?;
        if self.options.sort_batches {
            batches.sort();
        }
        Ok(batches)
    }

    /// Batches a run would attempt, without decoding anything or touching the store
    pub async fn pending(
        &self,
        batch_root: &Path,
        tracker: &ProcessedSetTracker,
    ) -> Result<Vec<PathBuf>> {
        let processed = tracker.load().await?;
        let batches = self.enumerate(batch_root).await?;
        Ok(batches
            .into_iter()
            .filter(|batch| batch_id(batch).map_or(true, |id| !processed.contains(&id)))
            .collect())
    }

    /// Process every batch not yet in the processed set, recording each one
    /// after its single attempt whatever the outcome.
    pub async fn run(
        &self,
        reference_path: &Path,
        batch_root: &Path,
        output_dir: &Path,
        tracker: &ProcessedSetTracker,
    ) -> Result<RunSummary> {
        let keys = self.load_reference(reference_path).await?;
        let mut processed = tracker.load().await?;

        let batches = self.enumerate(batch_root).await?;
        tokio::fs::create_dir_all(output_dir).await?;

        let mut summary = RunSummary {
            reference_keys: keys.len(),
            discovered: batches.len(),
            ..RunSummary::default()
        };

        for batch in &batches {
            let id = match batch_id(batch) {
                Ok(id) => id,
                Err(e) => {
                    error!("Error processing file {:?}: {}", batch, e);
                    summary.failed += 1;
                    summary.unrecorded += 1;
                    continue;
                }
            };
            if processed.contains(&id) {
                debug!("Skipping already processed file {}", id);
                summary.skipped += 1;
                continue;
            }

            let span = info_span!("batch", id = %id);
            let outcome = self
                .processor
                .process(batch, &keys, output_dir)
                .instrument(span.clone())
                .await;
            summary.tally(&outcome);

            if let Err(e) = tracker
                .record(&mut processed, &id)
                .instrument(span)
                .await
            {
                error!("Error logging processed file {}: {}", id, e);
                summary.unrecorded += 1;
            }
        }

        info!("All new files processed: {}", summary);
        Ok(summary)
    }
}

/// Stable identity of a batch: its path as enumerated from the root.
/// A path that is not valid UTF-8 has no faithful text form and is rejected.
pub fn batch_id(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| ReconcileError::InvalidBatchId(path.to_string_lossy().into_owned()))
}

//! Durable, append-only record of batches already attempted

use crate::error::{ReconcileError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Batch ids loaded from the store, grown in place during a run
#[derive(Debug, Default)]
pub struct ProcessedSet {
    ids: HashSet<String>,
    /// Store ends without a newline; the next append must terminate it first
    unterminated: bool,
}

impl ProcessedSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn parse(content: &str) -> Self {
        // an unterminated last line is still an entry
        let unterminated = !content.is_empty() && !content.ends_with('\n');

        let ids = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self { ids, unterminated }
    }
}

/// One batch id per line. Single writer; concurrent runs are not supported.
pub struct ProcessedSetTracker {
    path: PathBuf,
}

impl ProcessedSetTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. A missing store is an empty set, not an error.
    pub async fn load(&self) -> Result<ProcessedSet> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No processed files log found at {:?}, starting fresh.",
                    self.path
                );
                return Ok(ProcessedSet::default());
            }
            Err(source) => {
                return Err(ReconcileError::Tracker {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let set = ProcessedSet::parse(&content);
        if set.unterminated {
            warn!(
                "Processed files log {:?} does not end with a newline; it is added on the next append",
                self.path
            );
        }
        info!(
            "Loaded {} processed batch ids from {:?}",
            set.len(),
            self.path
        );
        Ok(set)
    }

    /// Durably append one id, then add it to the in-memory set
    pub async fn record(&self, set: &mut ProcessedSet, id: &str) -> Result<()> {
        if id.is_empty() || id.contains(['\n', '\r']) {
            return Err(ReconcileError::InvalidBatchId(id.to_string()));
        }

        let mut line = String::with_capacity(id.len() + 2);
        if set.unterminated {
            line.push('\n');
        }
        line.push_str(id);
        line.push('\n');

        self.append(line.as_bytes())
            .await
            .map_err(|source| ReconcileError::Tracker {
                path: self.path.clone(),
                source,
            })?;

        set.unterminated = false;
        set.ids.insert(id.to_string());
        debug!("Logged processed file {}", id);
        Ok(())
    }

    async fn append(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_data().await
    }
}

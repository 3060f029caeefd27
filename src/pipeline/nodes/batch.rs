use crate::correlate::{correlate, verify};
use crate::error::{ReconcileError, Result};
use crate::pipeline::keys::{
    BATCH_PATH, BATCH_TABLE, COLUMNS, OUTPUT_DIR, OUTPUT_FILE, REFERENCE_KEYS, VERIFICATION,
};
use crate::pipeline::{PipeMap, PipeNode};
use crate::table::{read_table, write_xlsx};
use crate::util::file::output_file_name;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Missing keys listed in a warning before the list is cut short
const MISSING_PREVIEW: usize = 20;

fn names(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

/// Table reader node - decode the batch file
pub struct TableReaderNode;

#[async_trait]
impl PipeNode for TableReaderNode {
    fn name(&self) -> String {
        "TableReader".to_string()
    }

    fn input(&self) -> Vec<String> {
        names(&[BATCH_PATH.name()])
    }

    fn output(&self) -> Vec<String> {
        names(&[BATCH_TABLE.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let path = data
            .get_typed(BATCH_PATH)
            .ok_or("Missing batch_path input")?;

        let table = read_table(path).await?;
        info!("Successfully read file {:?}", path);

        data.insert_typed(BATCH_TABLE, table);
        Ok(data)
    }
}

/// Correlator node - tag every record with its reference membership
pub struct CorrelatorNode;

#[async_trait]
impl PipeNode for CorrelatorNode {
    fn name(&self) -> String {
        "Correlator".to_string()
    }

    fn input(&self) -> Vec<String> {
        names(&[BATCH_TABLE.name(), REFERENCE_KEYS.name(), COLUMNS.name()])
    }

    fn output(&self) -> Vec<String> {
        names(&[BATCH_TABLE.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let table = data
            .take_typed(BATCH_TABLE)
            .ok_or("Missing batch_table input")?;
        let keys = data
            .get_typed(REFERENCE_KEYS)
            .ok_or("Missing reference_keys input")?;
        let columns = data.get_typed(COLUMNS).ok_or("Missing columns input")?;

        let tagged = correlate(table, &columns.subject, &columns.indicator, keys)?;
        debug!("Tagged {} records", tagged.len());

        data.insert_typed(BATCH_TABLE, tagged);
        Ok(data)
    }
}

/// Verifier node - apply the completeness gate
pub struct VerifierNode;

#[async_trait]
impl PipeNode for VerifierNode {
    fn name(&self) -> String {
        "Verifier".to_string()
    }

    fn input(&self) -> Vec<String> {
        names(&[BATCH_TABLE.name(), REFERENCE_KEYS.name(), COLUMNS.name()])
    }

    fn output(&self) -> Vec<String> {
        names(&[VERIFICATION.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let table = data
            .get_typed(BATCH_TABLE)
            .ok_or("Missing batch_table input")?;
        let keys = data
            .get_typed(REFERENCE_KEYS)
            .ok_or("Missing reference_keys input")?;
        let columns = data.get_typed(COLUMNS).ok_or("Missing columns input")?;

        let result = verify(table, &columns.subject, keys)?;
        if result.complete {
            info!("All {} reference keys found in batch", keys.len());
        } else {
            let preview: Vec<&String> = result.missing.iter().take(MISSING_PREVIEW).collect();
            warn!(
                "Missing {} of {} reference keys in batch: {:?}{}",
                result.missing.len(),
                keys.len(),
                preview,
                if result.missing.len() > MISSING_PREVIEW { " ..." } else { "" }
            );
        }

        data.insert_typed(VERIFICATION, result);
        Ok(data)
    }
}

/// Output writer node - write verified batches, hold back the rest
pub struct OutputWriterNode;

#[async_trait]
impl PipeNode for OutputWriterNode {
    fn name(&self) -> String {
        "OutputWriter".to_string()
    }

    fn input(&self) -> Vec<String> {
        names(&[
            BATCH_TABLE.name(),
            VERIFICATION.name(),
            BATCH_PATH.name(),
            OUTPUT_DIR.name(),
        ])
    }

    fn output(&self) -> Vec<String> {
        names(&[OUTPUT_FILE.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let verification = data
            .get_typed(VERIFICATION)
            .ok_or("Missing verification input")?;

        if !verification.complete {
            data.insert_typed(OUTPUT_FILE, None);
            return Ok(data);
        }

        let batch_path = data
            .get_typed(BATCH_PATH)
            .ok_or("Missing batch_path input")?;
        let output_dir = data
            .get_typed(OUTPUT_DIR)
            .ok_or("Missing output_dir input")?;
        let table = data
            .get_typed(BATCH_TABLE)
            .ok_or("Missing batch_table input")?;

        let file_name = output_file_name(batch_path).ok_or_else(|| {
            ReconcileError::other(format!("Batch path {batch_path:?} has no file name"))
        })?;
        let output_path = output_dir.join(file_name);
        if tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            warn!("Overwriting existing output {:?}", output_path);
        }

        write_xlsx(table, &output_path).await?;
        info!("File written to {:?}", output_path);

        data.insert_typed(OUTPUT_FILE, Some(output_path));
        Ok(data)
    }
}

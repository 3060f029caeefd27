use super::Table;
use crate::error::{TableError, TableResult};
use crate::util::file::is_workbook_file;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;

/// Decode a table from disk. Workbooks are read from their first worksheet,
/// anything else as comma-delimited text with a header row.
pub async fn read_table(path: &Path) -> TableResult<Table> {
    let table = if is_workbook_file(path) {
        read_workbook(path)?
    } else {
        let bytes = tokio::fs::read(path).await?;
        read_csv(&bytes)?
    };

    debug!(
        "Read {} rows, {} columns from {:?}",
        table.len(),
        table.headers().len(),
        path
    );
    Ok(table)
}

/// Decode delimited text; ragged rows are rejected
pub fn read_csv(bytes: &[u8]) -> TableResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()?
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(|s| s.to_string()).collect())?;
    }
    Ok(table)
}

fn read_workbook(path: &Path) -> TableResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::NoWorksheet)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_text).collect())?;
    }
    Ok(table)
}

/// Canonical text of a workbook cell; integral floats print without a fraction
fn cell_text(cell: &Data) -> String {
    cell.to_string()
}

use super::Table;
use crate::error::{TableError, TableResult};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

/// Write a table as a single-sheet workbook. The file is staged next to the
/// target and renamed into place, so a failed write leaves no output behind.
pub async fn write_xlsx(table: &Table, path: &Path) -> TableResult<()> {
    let buffer = encode_xlsx(table)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = path.with_extension("xlsx.partial");
    let written = match tokio::fs::write(&staging, buffer).await {
        Ok(()) => tokio::fs::rename(&staging, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    debug!("Wrote {} rows to {:?}", table.len(), path);
    Ok(())
}

/// Encode header + rows, every cell as text. Empty cells stay blank.
pub fn encode_xlsx(table: &Table) -> TableResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, column_number(col)?, header)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(index + 1)
            .map_err(|_| TableError::invalid_format("too many rows for a worksheet"))?;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet.write_string(row_number, column_number(col)?, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_number(col: usize) -> TableResult<u16> {
    u16::try_from(col).map_err(|_| TableError::invalid_format("too many columns for a worksheet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample() -> Table {
        Table::from_rows(vec!["PersNo".into()], vec![vec!["100".into()]]).unwrap()
    }

    #[tokio::test]
    async fn test_write_leaves_only_final_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/batch.xlsx");

        write_xlsx(&sample(), &path).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["batch.xlsx"]);
    }

    #[tokio::test]
    async fn test_failed_write_removes_staging_file() {
        let dir = TempDir::new().unwrap();
        // a non-empty directory in the way makes the final rename fail
        let path = dir.path().join("batch.xlsx");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(matches!(
            write_xlsx(&sample(), &path).await,
            Err(TableError::Io(_))
        ));
        assert!(!dir.path().join("batch.xlsx.partial").exists());
    }

    #[test]
    fn test_encode_keeps_literal_text() {
        let table = Table::from_rows(
            vec!["PersNo".into(), "Note".into(), "indicator".into()],
            vec![
                vec!["00100".into(), "".into(), "TRUE".into()],
                vec!["102".into(), "x".into(), "FALSE".into()],
            ],
        )
        .unwrap();

        let buffer = encode_xlsx(&table).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(buffer)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][2], Data::String("indicator".into()));
        assert_eq!(rows[1][0], Data::String("00100".into()));
        assert_eq!(rows[1][1], Data::Empty);
        assert_eq!(rows[1][2], Data::String("TRUE".into()));
        assert_eq!(rows[2][2], Data::String("FALSE".into()));
    }
}

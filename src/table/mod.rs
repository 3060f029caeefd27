//! In-memory tabular data shared by the reference and batch sides

pub mod reader;
pub mod writer;

pub use reader::read_table;
pub use writer::write_xlsx;

use crate::error::{TableError, TableResult};

/// Header row plus text cells. Every row has exactly one cell per header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> TableResult<Self> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> TableResult<()> {
        if row.len() != self.headers.len() {
            return Err(TableError::invalid_format(format!(
                "row {} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cells of one column, in row order
    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> TableResult<impl Iterator<Item = &'a str> + use<'a>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::missing_column(name))?;
        Ok(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Replace the column called `name`, or append it when absent
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> TableResult<()> {
        if values.len() != self.rows.len() {
            return Err(TableError::invalid_format(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["PersNo".into(), "Name".into()],
            vec![
                vec!["100".into(), "Ada".into()],
                vec!["102".into(), "Grace".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(vec!["1".into()]).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        let ids: Vec<&str> = table.column("PersNo").unwrap().collect();
        assert_eq!(ids, vec!["100", "102"]);

        assert!(matches!(
            table.column("Missing").map(|c| c.count()),
            Err(TableError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut table = sample();
        table
            .set_column("flag", vec!["TRUE".into(), "FALSE".into()])
            .unwrap();
        assert_eq!(table.headers(), ["PersNo", "Name", "flag"]);
        assert_eq!(table.rows()[1], vec!["102", "Grace", "FALSE"]);

        table
            .set_column("flag", vec!["FALSE".into(), "TRUE".into()])
            .unwrap();
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.rows()[0][2], "FALSE");
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut table = sample();
        assert!(table.set_column("flag", vec!["TRUE".into()]).is_err());
    }
}

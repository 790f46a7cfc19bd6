use crate::error::TableScanError;
use crate::grid::cell::CellValue;
use crate::grid::Grid;
use crate::reader::ReaderError;
use crate::reader::SheetReader;

/// An in-memory multi-sheet source, for embedding callers that already hold
/// parsed cell values and for tests.
pub struct MemoryReader {
    file_name: String,
    sheets: Vec<(String, Vec<Vec<CellValue>>)>,
}

impl MemoryReader {
    /// Creates an empty source with the given provenance name.
    pub fn new(file_name: &str) -> Self {
        MemoryReader {
            file_name: file_name.to_owned(),
            sheets: Vec::new(),
        }
    }

    /// Appends a sheet of row-major values.
    pub fn push_sheet(&mut self, sheet_name: &str, rows: Vec<Vec<CellValue>>) -> &mut Self {
        self.sheets.push((sheet_name.to_owned(), rows));
        self
    }
}

impl SheetReader for MemoryReader {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    fn read_sheet(&self, sheet_name: &str) -> Result<Grid, TableScanError> {
        let rows = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, rows)| rows.clone())
            .ok_or(ReaderError::SheetNotFound {
                file: self.file_name.to_owned(),
                sheet: sheet_name.to_owned(),
            })?;
        Ok(Grid::from_rows(&self.file_name, sheet_name, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_pushed_sheets() {
        let mut reader = MemoryReader::new("report.xlsx");
        reader.push_sheet(
            "Sheet1",
            vec![vec![CellValue::parse("a"), CellValue::parse("1")]],
        );
        assert_eq!(reader.sheet_names(), vec!["Sheet1"]);

        let grid = reader.read_sheet("Sheet1").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.sheet_name, "Sheet1");
        assert!(reader.read_sheet("Sheet2").is_err());
    }
}

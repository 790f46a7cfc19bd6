use crate::error::ResultMessage;
use crate::error::TableScanError;
use crate::grid::cell::Cell;
use crate::grid::cell::CellValue;
use crate::grid::Grid;
use crate::reader::ReaderError;
use crate::reader::SheetReader;
use std::path::Path;
use std::path::PathBuf;

/// Reads a delimited text file as a single-sheet source.
///
/// Every field goes through scalar type inference
/// ([`CellValue::parse`]), so a CSV grid carries the same type tags as one
/// supplied by a spreadsheet-aware reader. The single sheet is named after
/// the file stem.
pub struct CsvReader {
    path: PathBuf,
    file_name: String,
    sheet_name: String,
    delimiter: u8,
}

impl CsvReader {
    /// Creates a reader for the given path and field delimiter.
    pub fn new<P: AsRef<Path>>(path: P, delimiter: u8) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path.to_string_lossy().to_string();
        let sheet_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_owned());
        CsvReader {
            path,
            file_name,
            sheet_name,
            delimiter,
        }
    }
}

impl SheetReader for CsvReader {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name.to_owned()]
    }

    fn read_sheet(&self, sheet_name: &str) -> Result<Grid, TableScanError> {
        if sheet_name != self.sheet_name {
            return Err(ReaderError::SheetNotFound {
                file: self.file_name.to_owned(),
                sheet: sheet_name.to_owned(),
            })?;
        }
        self.load().with_prefix(&self.file_name)
    }
}

impl CsvReader {
    fn load(&self) -> Result<Grid, TableScanError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;
        let mut grid = Grid::new(&self.file_name, &self.sheet_name);
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (col, field) in record.iter().enumerate() {
                grid.push(Cell {
                    row,
                    col,
                    value: CellValue::parse(field),
                });
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::CellType;
    use std::io::Write;

    fn write_file(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_csv_with_type_inference() {
        let (_dir, path) = write_file(
            "scores.csv",
            "Name,Score,Joined\nAlice,90,2024-01-05\nBob,85,2024-02-06\n",
        );
        let reader = CsvReader::new(&path, b',');
        assert_eq!(reader.sheet_names(), vec!["scores"]);

        let grid = reader.read_sheet("scores").unwrap();
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.get(0, 0).unwrap().kind(), CellType::Text);
        assert_eq!(grid.get(1, 1).unwrap().kind(), CellType::Number);
        assert_eq!(grid.get(1, 2).unwrap().kind(), CellType::DateTime);
    }

    #[test]
    fn blank_fields_leave_gaps() {
        let (_dir, path) = write_file("gaps.csv", "a,,c\n,,\nx,y,z\n");
        let grid = CsvReader::new(&path, b',').read_sheet("gaps").unwrap();
        assert_eq!(grid.len(), 5);
        assert!(grid.get(0, 1).is_none());
        assert!(grid.get(1, 0).is_none());
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let (_dir, path) = write_file("one.csv", "a\n");
        let reader = CsvReader::new(&path, b',');
        assert!(reader.read_sheet("other").is_err());
    }

    #[test]
    fn missing_file_error_names_the_file() {
        let reader = CsvReader::new("does_not_exist.csv", b',');
        let error = reader.read_sheet("does_not_exist").unwrap_err();
        assert!(error.to_string().starts_with("does_not_exist.csv: "));
    }
}

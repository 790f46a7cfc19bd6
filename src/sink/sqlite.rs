use crate::detect::assembler::TableRecord;
use crate::error::TableScanError;
use crate::sink::Sink;
use rusqlite::params;
use rusqlite::Connection;
use std::path::Path;

/// Persists extracted tables to a SQLite database, one row per data cell.
///
/// Schema mirrors the downstream query model: every cell row carries its
/// provenance (file, sheet, block reference), its column and row headers,
/// its absolute grid position, and the stringified value with its type tag.
pub struct SqliteSink {
    conn: Connection,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cells (
    id        INTEGER PRIMARY KEY,
    f_name    TEXT NOT NULL,
    sheet     TEXT NOT NULL,
    bounds    TEXT NOT NULL,
    c_header  TEXT NOT NULL,
    r_header  TEXT,
    row       INTEGER NOT NULL,
    col       INTEGER NOT NULL,
    value     TEXT NOT NULL,
    kind      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS cells_by_sheet ON cells (f_name, sheet);
";

impl SqliteSink {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TableScanError> {
        Self::prepare(Connection::open(path)?)
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, TableScanError> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, TableScanError> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteSink { conn })
    }

    /// The underlying connection, for callers that query after extraction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Sink for SqliteSink {
    fn write(&mut self, record: &TableRecord) -> Result<(), TableScanError> {
        let row_lower = record.data_row_lower();
        let col_lower = record.data_col_lower();
        let tx = self.conn.transaction()?;
        {
            let mut statement = tx.prepare_cached(
                "INSERT INTO cells (f_name, sheet, bounds, c_header, r_header, row, col, value, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (row_index, data_row) in record.data.iter().enumerate() {
                for (col_index, value) in data_row.iter().enumerate() {
                    statement.execute(params![
                        record.file_name,
                        record.sheet_name,
                        record.bounds.reference(),
                        record.column_labels[col_index],
                        record.row_labels.get(row_index),
                        (row_lower + row_index) as i64,
                        (col_lower + col_index) as i64,
                        value.to_string(),
                        value.kind().as_str(),
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::CellValue;
    use crate::pipeline;
    use crate::pipeline::ExtractOptions;
    use crate::reader::memory::MemoryReader;
    use crate::reader::SheetReader;

    #[test]
    fn writes_one_row_per_data_cell() {
        let mut reader = MemoryReader::new("a.csv");
        reader.push_sheet(
            "scores",
            vec![
                vec![CellValue::parse("Name"), CellValue::parse("Score")],
                vec![CellValue::parse("Alice"), CellValue::parse("90")],
                vec![CellValue::parse("Bob"), CellValue::parse("85")],
            ],
        );
        let grid = reader.read_sheet("scores").unwrap();
        let records = pipeline::extract_grid(&grid, &ExtractOptions::default());

        let mut sink = SqliteSink::open_in_memory().unwrap();
        for record in &records {
            sink.write(record).unwrap();
        }

        let count: i64 = sink
            .connection()
            .query_row("SELECT COUNT(*) FROM cells", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);

        let (value, kind, header): (String, String, String) = sink
            .connection()
            .query_row(
                "SELECT value, kind, c_header FROM cells WHERE row = 1 AND col = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(value, "90");
        assert_eq!(kind, "number");
        assert_eq!(header, "Score");
    }
}

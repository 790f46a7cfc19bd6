//! # Output Sinks
//!
//! Consumers of extracted [`TableRecord`]s. The pipeline hands each record
//! to the sink exactly once and never retries a failed write; parallel
//! extraction serializes writes so a sink only ever sees one record at a
//! time.

pub mod sqlite;

use crate::detect::assembler::TableRecord;
use crate::error::TableScanError;
use std::io::Write;

/// Accepts a sequence of table records.
///
/// Implementations must be `Send` so the pipeline can drive a shared sink
/// from its worker threads (behind a lock).
pub trait Sink: Send {
    /// Writes one record. A failure is surfaced to the caller immediately.
    fn write(&mut self, record: &TableRecord) -> Result<(), TableScanError>;

    /// Flushes buffered output after the last record.
    fn flush(&mut self) -> Result<(), TableScanError> {
        Ok(())
    }
}

/// Prints each record as an aligned text table, one block per record.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
}

impl ConsoleSink<std::io::Stdout> {
    /// Creates a sink printing to standard output.
    pub fn stdout() -> Self {
        ConsoleSink {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        ConsoleSink { out }
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn write(&mut self, record: &TableRecord) -> Result<(), TableScanError> {
        writeln!(
            self.out,
            "{}[{}] {} ({} x {})",
            record.file_name,
            record.sheet_name,
            record.bounds.reference(),
            record.data.len(),
            record.column_labels.len(),
        )?;

        // Row labels, when present, get an unlabeled leading column
        let labeled = !record.row_labels.is_empty();
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(record.data.len() + 1);
        let mut head: Vec<String> = Vec::new();
        if labeled {
            head.push(String::new());
        }
        head.extend(record.column_labels.iter().cloned());
        rows.push(head);
        for (index, data_row) in record.data.iter().enumerate() {
            let mut row: Vec<String> = Vec::new();
            if labeled {
                row.push(record.row_labels[index].to_owned());
            }
            row.extend(data_row.iter().map(|value| value.to_string()));
            rows.push(row);
        }

        let columns = rows[0].len();
        let widths: Vec<usize> = (0..columns)
            .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
            .collect();
        for (index, row) in rows.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:width$}", text, width = *width))
                .collect();
            writeln!(self.out, "{}", line.join(" | ").trim_end())?;
            if index == 0 {
                let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
                writeln!(self.out, "{}", rule.join("-+-"))?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TableScanError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each record as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink { out }
    }
}

impl<W: Write + Send> Sink for JsonLinesSink<W> {
    fn write(&mut self, record: &TableRecord) -> Result<(), TableScanError> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TableScanError> {
        self.out.flush()?;
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

    fn sample_record() -> TableRecord {
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
        let mut records = pipeline::extract_grid(&grid, &ExtractOptions::default());
        assert_eq!(records.len(), 1);
        records.remove(0)
    }

    #[test]
    fn console_sink_renders_aligned_table() {
        let record = sample_record();
        let mut out = Vec::new();
        ConsoleSink::new(&mut out).write(&record).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a.csv[scores] A1:B3 (2 x 2)"));
        assert!(text.contains("Name  | Score"));
        assert!(text.contains("Alice | 90"));
    }

    #[test]
    fn jsonl_sink_emits_one_object_per_line() {
        let record = sample_record();
        let mut out = Vec::new();
        let mut sink = JsonLinesSink::new(&mut out);
        sink.write(&record).unwrap();
        sink.write(&record).unwrap();
        sink.flush().unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["file_name"], "a.csv");
        assert_eq!(value["column_labels"][1], "Score");
        assert_eq!(value["data"][0][1]["type"], "number");
    }
}

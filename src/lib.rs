//! # tablescan
//!
//! Detects and extracts tables from loosely structured 2-D grids of
//! spreadsheet cell values.
//!
//! ## Features
//!
//! - **Region scanning**: iterative flood-fill partitioning of non-empty
//!   cells into maximal contiguous blocks, with configurable gap tolerance
//! - **Header inference**: type-mismatch heuristics classify leading header
//!   rows (multi-row headers supported) and a leading row-header column
//! - **Normalized records**: each table is emitted with provenance, unique
//!   column labels, optional row labels, and a typed data matrix
//! - **Failure isolation**: a sheet that fails to read is recorded and
//!   skipped; the remaining sheets and files are still processed
//! - **Parallel extraction**: sheets are independent pure computations and
//!   run on a thread pool; sink writes are serialized
//! - **Pluggable sinks**: console printer, JSON Lines writer, and a SQLite
//!   writer with one row per extracted cell
//!
//! ## Example
//!
//! ```
//! use tablescan::grid::cell::CellValue;
//! use tablescan::pipeline::{self, ExtractOptions};
//! use tablescan::reader::memory::MemoryReader;
//! use tablescan::reader::SheetReader;
//!
//! let mut reader = MemoryReader::new("scores.xlsx");
//! reader.push_sheet(
//!     "Sheet1",
//!     vec![
//!         vec![CellValue::parse("Name"), CellValue::parse("Score")],
//!         vec![CellValue::parse("Alice"), CellValue::parse("90")],
//!         vec![CellValue::parse("Bob"), CellValue::parse("85")],
//!     ],
//! );
//! let grid = reader.read_sheet("Sheet1").unwrap();
//! let records = pipeline::extract_grid(&grid, &ExtractOptions::default());
//! assert_eq!(records[0].column_labels, vec!["Name", "Score"]);
//! ```

pub mod detect;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod reader;
pub mod sink;

pub use crate::detect::assembler::TableRecord;
pub use crate::detect::header::HeaderSpec;
pub use crate::detect::scanner::CandidateBlock;
pub use crate::error::TableScanError;
pub use crate::grid::cell::{Cell, CellType, CellValue};
pub use crate::grid::range::Range;
pub use crate::grid::Grid;
pub use crate::pipeline::{ExtractOptions, Extraction, RunSummary, SheetFailure};
pub use crate::reader::SheetReader;
pub use crate::sink::Sink;

//! # Extraction Pipeline
//!
//! Orchestrates scanning, header classification and assembly across every
//! sheet of every input source. Each sheet's extraction is a pure,
//! self-contained computation, so sheets run in parallel; the only shared
//! resource is the output sink, which is driven behind a lock.

use crate::detect::assembler;
use crate::detect::assembler::TableRecord;
use crate::detect::header;
use crate::detect::scanner;
use crate::error::TableScanError;
use crate::grid::range::Range;
use crate::grid::Grid;
use crate::reader::SheetReader;
use crate::sink::Sink;
use glob::Pattern;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

/// Tuning options for one extraction run.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Adjacency slack for region merging: cells up to
    /// `1 + gap_tolerance` rows/columns apart belong to the same block
    pub gap_tolerance: usize,

    /// Ceiling for multi-row header detection (at least 1)
    pub max_header_rows: usize,

    /// Minimum data rows for a block to be emitted
    pub min_data_rows: usize,

    /// Minimum data columns for a block to be emitted
    pub min_data_cols: usize,

    /// Sheet name patterns for filtering which sheets to process
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Maximum number of successfully read sheets per source; a failed read
    /// does not consume a slot
    pub sheet_limit: Option<usize>,

    /// Restrict scanning to an Excel-style range of each sheet
    pub range: Option<Range>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            gap_tolerance: 0,
            max_header_rows: 2,
            min_data_rows: 1,
            min_data_cols: 1,
            sheet_name_patterns: None,
            sheet_limit: None,
            range: None,
        }
    }
}

impl ExtractOptions {
    /// Checks if a sheet name matches the configured patterns.
    /// Returns true if no patterns are specified or if any pattern matches.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }
}

/// A per-sheet failure recorded during extraction. Failures never abort the
/// remaining sheets or files.
#[derive(Clone, Debug)]
pub struct SheetFailure {
    pub file_name: String,
    pub sheet_name: String,
    pub message: String,
}

/// The outcome of an extraction run: records in sheet order plus the
/// per-sheet failures, so callers can distinguish partial success from
/// total failure.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<TableRecord>,
    pub failures: Vec<SheetFailure>,
}

/// The outcome of a sink-driven run.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of table records handed to the sink
    pub tables: usize,
    pub failures: Vec<SheetFailure>,
}

/// Extracts all viable tables from one grid.
///
/// Pure function of the grid and the options: running it twice yields
/// identical records. A grid with no viable tables yields an empty vector,
/// which is not an error.
pub fn extract_grid(grid: &Grid, options: &ExtractOptions) -> Vec<TableRecord> {
    let restricted;
    let grid = match &options.range {
        Some(range) => {
            restricted = grid.restrict(range);
            &restricted
        }
        None => grid,
    };
    let max_header_rows = options.max_header_rows.max(1);
    let blocks = scanner::scan(grid, options.gap_tolerance);
    tracing::debug!(
        file = grid.file_name.as_str(),
        sheet = grid.sheet_name.as_str(),
        blocks = blocks.len(),
        "scanned sheet"
    );
    blocks
        .iter()
        .filter_map(|block| {
            let spec = header::classify(grid, block, max_header_rows);
            assembler::assemble(grid, block, &spec, options.min_data_rows, options.min_data_cols)
        })
        .collect()
}

/// Extracts all tables from every accepted sheet of every reader, collecting
/// records and per-sheet failures. Sheets are processed in parallel.
pub fn extract(readers: &[Box<dyn SheetReader>], options: &ExtractOptions) -> Extraction {
    let (grids, failures) = collect_grids(readers, options);
    let records: Vec<TableRecord> = grids
        .par_iter()
        .flat_map(|grid| extract_grid(grid, options))
        .collect();
    Extraction { records, failures }
}

/// Extracts all tables and streams every record into the sink as its sheet
/// completes. Sink writes are serialized; a sink failure aborts the run
/// immediately and is returned to the caller.
pub fn run(
    readers: &[Box<dyn SheetReader>],
    options: &ExtractOptions,
    sink: &mut dyn Sink,
) -> Result<RunSummary, TableScanError> {
    let (grids, failures) = collect_grids(readers, options);
    let tables = AtomicUsize::new(0);
    let shared = Mutex::new(sink);
    grids
        .par_iter()
        .try_for_each(|grid| -> Result<(), TableScanError> {
            let records = extract_grid(grid, options);
            tables.fetch_add(records.len(), Ordering::Relaxed);
            let mut sink = shared.lock().expect("Sink lock");
            for record in &records {
                sink.write(record)?;
            }
            Ok(())
        })?;
    shared.into_inner().expect("Sink lock").flush()?;
    Ok(RunSummary {
        tables: tables.into_inner(),
        failures,
    })
}

/// Reads every accepted sheet into a grid, recording read failures instead
/// of propagating them.
fn collect_grids(
    readers: &[Box<dyn SheetReader>],
    options: &ExtractOptions,
) -> (Vec<Grid>, Vec<SheetFailure>) {
    let mut grids = Vec::new();
    let mut failures = Vec::new();
    for reader in readers {
        let mut accepted = 0usize;
        for sheet_name in reader.sheet_names() {
            if !options.accept(&sheet_name) {
                continue;
            }
            if options.sheet_limit.map_or(false, |limit| accepted >= limit) {
                break;
            }
            match reader.read_sheet(&sheet_name) {
                Ok(grid) => {
                    accepted += 1;
                    grids.push(grid);
                }
                Err(error) => {
                    tracing::warn!(
                        file = reader.file_name(),
                        sheet = sheet_name.as_str(),
                        "sheet read failed: {}",
                        error
                    );
                    failures.push(SheetFailure {
                        file_name: reader.file_name().to_owned(),
                        sheet_name,
                        message: error.to_string(),
                    });
                }
            }
        }
    }
    (grids, failures)
}

use crate::detect::header::HeaderSpec;
use crate::detect::scanner::CandidateBlock;
use crate::grid::cell::CellValue;
use crate::grid::Grid;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;

/// The final normalized output unit: header labels plus a row-major data
/// matrix, tagged with its provenance. Records are immutable once emitted;
/// sinks consume them without mutation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRecord {
    /// Source file name
    pub file_name: String,
    /// Sheet name
    pub sheet_name: String,
    /// Bounding box of the originating block, headers included
    pub bounds: CandidateBlock,
    /// Column labels, one per data column, duplicates disambiguated
    pub column_labels: Vec<String>,
    /// Row labels, one per data row; empty when no row-header column exists
    pub row_labels: Vec<String>,
    /// Row-major data matrix, header rows and columns excluded.
    /// Cell values keep their inferred type; no coercion happens here.
    pub data: Vec<Vec<CellValue>>,
}

impl TableRecord {
    /// Grid row index of the first data row.
    pub fn data_row_lower(&self) -> usize {
        self.bounds.row_upper + 1 - self.data.len()
    }

    /// Grid column index of the first data column.
    pub fn data_col_lower(&self) -> usize {
        self.bounds.col_upper + 1 - self.column_labels.len()
    }
}

/// Combines a candidate block and its header spec into a table record, or
/// drops the block when the remaining data matrix is smaller than the
/// viability thresholds (at least one data row and one data column, raised
/// by `min_data_rows`/`min_data_cols`).
pub fn assemble(
    grid: &Grid,
    block: &CandidateBlock,
    spec: &HeaderSpec,
    min_data_rows: usize,
    min_data_cols: usize,
) -> Option<TableRecord> {
    // An isolated cell is never a table, headers or not
    if block.rows() == 1 && block.cols() == 1 {
        return None;
    }
    let data_rows = block.rows().checked_sub(spec.header_rows)?;
    let data_cols = block.cols().checked_sub(spec.header_cols)?;
    if data_rows < min_data_rows.max(1) || data_cols < min_data_cols.max(1) {
        return None;
    }
    let row_lower = block.row_lower + spec.header_rows;
    let col_lower = block.col_lower + spec.header_cols;

    let data = (row_lower..=block.row_upper)
        .map(|row| {
            (col_lower..=block.col_upper)
                .map(|col| {
                    grid.get(row, col)
                        .map(|cell| cell.value.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Some(TableRecord {
        file_name: grid.file_name.to_owned(),
        sheet_name: grid.sheet_name.to_owned(),
        bounds: *block,
        column_labels: column_labels(grid, block, spec, col_lower),
        row_labels: row_labels(grid, block, spec, row_lower),
        data,
    })
}

/// Derives one label per data column from the header rows.
///
/// Stacked header cells are joined top to bottom with a single space; a
/// column with no header text gets a positional placeholder, and duplicate
/// labels get a 1-based occurrence suffix ("Total", "Total_2", ...).
fn column_labels(
    grid: &Grid,
    block: &CandidateBlock,
    spec: &HeaderSpec,
    col_lower: usize,
) -> Vec<String> {
    let mut labels = Vec::with_capacity(block.col_upper - col_lower + 1);
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    for (index, col) in (col_lower..=block.col_upper).enumerate() {
        let mut parts: Vec<String> = Vec::new();
        for row in block.row_lower..block.row_lower + spec.header_rows {
            if let Some(cell) = grid.get(row, col) {
                let text = cell.value.to_string();
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }
        let base = if parts.is_empty() {
            format!("col_{}", index)
        } else {
            parts.join(" ")
        };
        // A suffixed label can still collide with a literal header that
        // already carries the same name, so keep bumping until it is unique.
        let count = occurrences.entry(base.clone()).or_insert(0);
        *count += 1;
        let mut label = if *count == 1 {
            base.clone()
        } else {
            format!("{}_{}", base, count)
        };
        while !used.insert(label.clone()) {
            *count += 1;
            label = format!("{}_{}", base, count);
        }
        labels.push(label);
    }
    labels
}

/// Derives one label per data row from the row-header column, if any.
fn row_labels(grid: &Grid, block: &CandidateBlock, spec: &HeaderSpec, row_lower: usize) -> Vec<String> {
    if spec.header_cols == 0 {
        return Vec::new();
    }
    (row_lower..=block.row_upper)
        .enumerate()
        .map(|(index, row)| {
            let label = grid
                .get(row, block.col_lower)
                .map(|cell| cell.value.to_string())
                .unwrap_or_default();
            if label.is_empty() {
                format!("row_{}", index)
            } else {
                label
            }
        })
        .collect()
}

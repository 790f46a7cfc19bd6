//! # Grid Model
//!
//! In-memory representation of one worksheet as a sparse 2-D map of typed
//! cells. A [`Grid`] is populated once by a sheet reader, scanned for table
//! regions, and dropped after its tables have been assembled.

pub mod cell;
pub mod range;
pub(crate) mod reference;

use crate::grid::cell::Cell;
use crate::grid::cell::CellValue;
use crate::grid::range::Range;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A sparse grid of non-empty cells for one worksheet.
///
/// Only non-empty cells are stored; `get` returns None for any position
/// without a value. Cells are tagged with the source file and sheet names so
/// provenance survives into the extracted records.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Source file name
    pub file_name: String,
    /// Sheet name
    pub sheet_name: String,
    /// All non-empty cells, in insertion order
    cells: Vec<Cell>,
    /// Index mapping from (row, col) to cell vector position
    indexes: HashMap<(usize, usize), usize>,
    /// Largest populated row index
    row_upper_bound: Option<usize>,
    /// Largest populated column index
    col_upper_bound: Option<usize>,
}

impl Grid {
    /// Creates an empty grid for the given source.
    pub fn new(file_name: &str, sheet_name: &str) -> Self {
        Grid {
            file_name: file_name.to_owned(),
            sheet_name: sheet_name.to_owned(),
            cells: Vec::new(),
            indexes: HashMap::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Builds a grid from row-major values; empty values are skipped.
    pub fn from_rows(file_name: &str, sheet_name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        let mut grid = Grid::new(file_name, sheet_name);
        for (row, values) in rows.into_iter().enumerate() {
            for (col, value) in values.into_iter().enumerate() {
                grid.push(Cell { row, col, value });
            }
        }
        grid
    }

    /// Adds a cell, updating the grid bounds.
    /// Empty values are ignored; a duplicate position replaces the old cell.
    pub fn push(&mut self, cell: Cell) {
        if cell.value.is_empty() {
            return;
        }
        self.row_upper_bound = Some(
            self.row_upper_bound
                .map_or(cell.row, |bound| bound.max(cell.row)),
        );
        self.col_upper_bound = Some(
            self.col_upper_bound
                .map_or(cell.col, |bound| bound.max(cell.col)),
        );
        match self.indexes.entry((cell.row, cell.col)) {
            Entry::Occupied(entry) => self.cells[*entry.get()] = cell,
            Entry::Vacant(entry) => {
                entry.insert(self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Gets the cell at the specified position, or None if it is empty.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.indexes
            .get(&(row, col))
            .and_then(|index| self.cells.get(*index))
    }

    /// Returns the largest populated (row, col) indexes, or None for an
    /// empty grid.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.row_upper_bound.zip(self.col_upper_bound)
    }

    /// Returns a fresh traversal over all non-empty cells.
    pub fn non_empty_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns true if the grid contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns a copy of this grid restricted to the given range.
    pub(crate) fn restrict(&self, range: &Range) -> Grid {
        let mut grid = Grid::new(&self.file_name, &self.sheet_name);
        for cell in &self.cells {
            if range.contains(cell.row, cell.col) {
                grid.push(cell.clone());
            }
        }
        grid
    }
}

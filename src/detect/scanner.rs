use crate::grid::reference::index_to_reference;
use crate::grid::Grid;
use serde::Serialize;
use std::collections::HashSet;

/// A maximal rectangular bounding box of one contiguous region of non-empty
/// cells. Boxes from the same scan pass never overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateBlock {
    /// First row of the box (0-based, inclusive)
    pub row_lower: usize,
    /// Last row of the box (0-based, inclusive)
    pub row_upper: usize,
    /// First column of the box (0-based, inclusive)
    pub col_lower: usize,
    /// Last column of the box (0-based, inclusive)
    pub col_upper: usize,
}

impl CandidateBlock {
    /// Number of rows covered by the box.
    pub fn rows(&self) -> usize {
        self.row_upper - self.row_lower + 1
    }

    /// Number of columns covered by the box.
    pub fn cols(&self) -> usize {
        self.col_upper - self.col_lower + 1
    }

    /// Checks whether a position falls inside the box.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.row_lower <= row && row <= self.row_upper && self.col_lower <= col && col <= self.col_upper
    }

    /// Checks whether two boxes share at least one position.
    pub fn overlaps(&self, other: &CandidateBlock) -> bool {
        self.row_lower <= other.row_upper
            && other.row_lower <= self.row_upper
            && self.col_lower <= other.col_upper
            && other.col_lower <= self.col_upper
    }

    /// Returns the Excel-style reference of the box (e.g., "A1:C3").
    pub fn reference(&self) -> String {
        format!(
            "{}:{}",
            index_to_reference(self.row_lower, self.col_lower),
            index_to_reference(self.row_upper, self.col_upper)
        )
    }

    fn extend(&mut self, row: usize, col: usize) {
        self.row_lower = self.row_lower.min(row);
        self.row_upper = self.row_upper.max(row);
        self.col_lower = self.col_lower.min(col);
        self.col_upper = self.col_upper.max(col);
    }

    fn merge(&self, other: &CandidateBlock) -> CandidateBlock {
        CandidateBlock {
            row_lower: self.row_lower.min(other.row_lower),
            row_upper: self.row_upper.max(other.row_upper),
            col_lower: self.col_lower.min(other.col_lower),
            col_upper: self.col_upper.max(other.col_upper),
        }
    }
}

/// Partitions the grid's non-empty cells into candidate blocks.
///
/// Two cells are adjacent when both their row and column distances are at
/// most `1 + gap_tolerance`; with the default tolerance of 0 that is plain
/// 8-neighborhood contiguity. Components are found by an iterative
/// flood-fill over an explicit work list, so deep regions cannot overflow
/// the stack. Each component is cropped to its tightest bounding rectangle;
/// empty cells inside the rectangle stay part of the table as empty data
/// points. An empty grid yields no blocks.
pub fn scan(grid: &Grid, gap_tolerance: usize) -> Vec<CandidateBlock> {
    let reach = 1 + gap_tolerance;
    let mut positions: Vec<(usize, usize)> = grid
        .non_empty_cells()
        .map(|cell| (cell.row, cell.col))
        .collect();
    // Fixed traversal order keeps the scan deterministic
    positions.sort_unstable();
    let occupied: HashSet<(usize, usize)> = positions.iter().copied().collect();

    let mut visited: HashSet<(usize, usize)> = HashSet::with_capacity(positions.len());
    let mut blocks: Vec<CandidateBlock> = Vec::new();
    for &start in &positions {
        if visited.contains(&start) {
            continue;
        }
        visited.insert(start);
        let mut block = CandidateBlock {
            row_lower: start.0,
            row_upper: start.0,
            col_lower: start.1,
            col_upper: start.1,
        };
        let mut pending = vec![start];
        while let Some((row, col)) = pending.pop() {
            block.extend(row, col);
            for next_row in row.saturating_sub(reach)..=(row + reach) {
                for next_col in col.saturating_sub(reach)..=(col + reach) {
                    let next = (next_row, next_col);
                    if next != (row, col) && occupied.contains(&next) && visited.insert(next) {
                        pending.push(next);
                    }
                }
            }
        }
        blocks.push(block);
    }

    merge_overlapping(&mut blocks);
    blocks.sort_unstable_by_key(|block| (block.row_lower, block.col_lower));
    blocks
}

/// Merges blocks whose bounding boxes overlap until none do.
/// Disjoint components can still produce overlapping boxes (an L- or
/// U-shaped region wrapping around an isolated cell), and overlapping boxes
/// would break the one-block-per-cell invariant downstream.
fn merge_overlapping(blocks: &mut Vec<CandidateBlock>) {
    loop {
        let mut merged = false;
        'search: for i in 0..blocks.len() {
            for j in (i + 1)..blocks.len() {
                if blocks[i].overlaps(&blocks[j]) {
                    let other = blocks.swap_remove(j);
                    blocks[i] = blocks[i].merge(&other);
                    merged = true;
                    break 'search;
                }
            }
        }
        if !merged {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::cell::Cell;
    use crate::grid::cell::CellValue;

    fn grid_of(positions: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new("a.csv", "a");
        for &(row, col) in positions {
            grid.push(Cell {
                row,
                col,
                value: CellValue::Text("x".to_owned()),
            });
        }
        grid
    }

    #[test]
    fn empty_grid_yields_no_blocks() {
        let grid = Grid::new("a.csv", "a");
        assert!(scan(&grid, 0).is_empty());
    }

    #[test]
    fn single_cell_yields_unit_block() {
        let blocks = scan(&grid_of(&[(5, 5)]), 0);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rows(), 1);
        assert_eq!(blocks[0].cols(), 1);
        assert_eq!(blocks[0].reference(), "F6:F6");
    }

    #[test]
    fn contiguous_region_forms_one_block() {
        let blocks = scan(&grid_of(&[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]), 0);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rows(), 3);
        assert_eq!(blocks[0].cols(), 2);
    }

    #[test]
    fn blank_separator_splits_regions() {
        // Two regions separated by two blank rows
        let blocks = scan(
            &grid_of(&[(0, 0), (0, 1), (1, 0), (1, 1), (4, 0), (4, 1), (5, 0), (5, 1)]),
            0,
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].row_upper, 1);
        assert_eq!(blocks[1].row_lower, 4);
        assert!(!blocks[0].overlaps(&blocks[1]));
    }

    #[test]
    fn gap_tolerance_bridges_blank_rows() {
        let positions = [(0, 0), (0, 1), (2, 0), (2, 1)];
        assert_eq!(scan(&grid_of(&positions), 0).len(), 2);
        assert_eq!(scan(&grid_of(&positions), 1).len(), 1);
    }

    #[test]
    fn ragged_region_keeps_interior_gap() {
        // Missing interior cell at (1, 1) stays inside the bounding box
        let blocks = scan(&grid_of(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 2)]), 0);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains(1, 1));
    }

    #[test]
    fn overlapping_boxes_are_merged() {
        // U-shaped region wrapping an isolated cell at (3, 2): the two
        // components are not connected, but their boxes overlap.
        let mut positions = vec![(0, 1), (0, 2), (0, 3)];
        for row in 0..=3 {
            positions.push((row, 0));
            positions.push((row, 4));
        }
        positions.push((3, 2));
        let blocks = scan(&grid_of(&positions), 0);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rows(), 4);
        assert_eq!(blocks[0].cols(), 5);
    }
}

use crate::detect::scanner::CandidateBlock;
use crate::grid::cell::CellType;
use crate::grid::Grid;

/// Classification of which leading rows and columns of a block are headers,
/// anchored at the block's top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderSpec {
    /// Number of contiguous leading header rows (0, 1, or more, bounded by
    /// the configured ceiling)
    pub header_rows: usize,
    /// Number of contiguous leading row-header columns (0 or 1)
    pub header_cols: usize,
}

/// Decides the header rows and the row-header column of a candidate block.
///
/// The decision is a pure function of the block's cell values: the same
/// block always yields the same spec. A leading row counts as a header when
/// it is predominantly textual and at least half of the columns with a
/// recognizable body type show a text-over-scalar mismatch against the rows
/// beneath it. Classification extends downward one row at a time up to
/// `max_header_rows`. The leading column is classified symmetrically,
/// capped at one column.
pub fn classify(grid: &Grid, block: &CandidateBlock, max_header_rows: usize) -> HeaderSpec {
    let header_rows = classify_rows(grid, block, max_header_rows);
    let header_cols = classify_cols(grid, block, header_rows);
    HeaderSpec {
        header_rows,
        header_cols,
    }
}

fn classify_rows(grid: &Grid, block: &CandidateBlock, max_header_rows: usize) -> usize {
    let mut depth = 0;
    while depth < max_header_rows {
        let row = block.row_lower + depth;
        let body_lower = row + 1;
        // A header needs at least one data row beneath it
        if body_lower > block.row_upper {
            break;
        }
        if !is_header_row(grid, block, row, body_lower) {
            break;
        }
        depth += 1;
    }
    depth
}

fn is_header_row(grid: &Grid, block: &CandidateBlock, row: usize, body_lower: usize) -> bool {
    let mut filled = 0;
    let mut textual = 0;
    for col in block.col_lower..=block.col_upper {
        if let Some(cell) = grid.get(row, col) {
            filled += 1;
            if cell.kind().is_text() {
                textual += 1;
            }
        }
    }
    if filled == 0 || textual * 2 < filled {
        return false;
    }

    // The mismatch test only covers columns that carry a header entry and
    // whose body has a recognizable dominant type.
    let mut determinate = 0;
    let mut mismatched = 0;
    for col in block.col_lower..=block.col_upper {
        let Some(label) = grid.get(row, col) else {
            continue;
        };
        let Some(kind) = dominant_kind(column_cells(grid, block, col, body_lower)) else {
            continue;
        };
        determinate += 1;
        if label.kind().is_text() && kind.is_scalar() {
            mismatched += 1;
        }
    }
    mismatched > 0 && mismatched * 2 >= determinate
}

fn classify_cols(grid: &Grid, block: &CandidateBlock, header_rows: usize) -> usize {
    let col = block.col_lower;
    // A row-header column needs at least one data column beside it
    if col == block.col_upper {
        return 0;
    }
    let body_lower = block.row_lower + header_rows;
    if body_lower > block.row_upper {
        return 0;
    }
    // A labeled top-left corner means the leading column is ordinary data;
    // row-header columns sit under an empty corner (pivot-style layouts).
    if header_rows > 0 && grid.get(block.row_lower, col).is_some() {
        return 0;
    }

    let mut filled = 0;
    let mut textual = 0;
    let mut determinate = 0;
    let mut mismatched = 0;
    for row in body_lower..=block.row_upper {
        let Some(label) = grid.get(row, col) else {
            continue;
        };
        filled += 1;
        if label.kind().is_text() {
            textual += 1;
        }
        let Some(kind) = dominant_kind(row_cells(grid, block, row, col + 1)) else {
            continue;
        };
        determinate += 1;
        if label.kind().is_text() && kind.is_scalar() {
            mismatched += 1;
        }
    }
    if filled > 0 && textual * 2 >= filled && mismatched > 0 && mismatched * 2 >= determinate {
        1
    } else {
        0
    }
}

fn column_cells<'a>(
    grid: &'a Grid,
    block: &CandidateBlock,
    col: usize,
    row_lower: usize,
) -> impl Iterator<Item = CellType> + 'a {
    let row_upper = block.row_upper;
    (row_lower..=row_upper).filter_map(move |row| grid.get(row, col).map(|cell| cell.kind()))
}

fn row_cells<'a>(
    grid: &'a Grid,
    block: &CandidateBlock,
    row: usize,
    col_lower: usize,
) -> impl Iterator<Item = CellType> + 'a {
    let col_upper = block.col_upper;
    (col_lower..=col_upper).filter_map(move |col| grid.get(row, col).map(|cell| cell.kind()))
}

/// Returns the kind covering more than half of the non-empty cells, or None
/// when the cells are empty or too mixed to call.
fn dominant_kind(kinds: impl Iterator<Item = CellType>) -> Option<CellType> {
    const CANDIDATES: [CellType; 5] = [
        CellType::Text,
        CellType::Number,
        CellType::Boolean,
        CellType::DateTime,
        CellType::Error,
    ];
    let mut counts = [0usize; 5];
    let mut total = 0usize;
    for kind in kinds {
        for (index, candidate) in CANDIDATES.iter().enumerate() {
            if kind == *candidate {
                counts[index] += 1;
            }
        }
        total += 1;
    }
    if total == 0 {
        return None;
    }
    CANDIDATES
        .iter()
        .enumerate()
        .find(|(index, _)| counts[*index] * 2 > total)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::scanner;
    use crate::grid::cell::CellValue;

    fn grid_of(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            "a.csv",
            "a",
            rows.iter()
                .map(|row| row.iter().map(|text| CellValue::parse(text)).collect())
                .collect(),
        )
    }

    fn classify_single(grid: &Grid) -> HeaderSpec {
        let blocks = scanner::scan(grid, 0);
        assert_eq!(blocks.len(), 1);
        classify(grid, &blocks[0], 2)
    }

    #[test]
    fn textual_row_over_numbers_is_header() {
        let grid = grid_of(&[&["Name", "Score"], &["Alice", "90"], &["Bob", "85"]]);
        let spec = classify_single(&grid);
        assert_eq!(spec.header_rows, 1);
        assert_eq!(spec.header_cols, 0);
    }

    #[test]
    fn numeric_block_has_no_header() {
        let grid = grid_of(&[&["1", "2"], &["3", "4"]]);
        assert_eq!(classify_single(&grid), HeaderSpec::default());
    }

    #[test]
    fn textual_block_has_no_header() {
        let grid = grid_of(&[&["north", "south"], &["east", "west"]]);
        assert_eq!(classify_single(&grid), HeaderSpec::default());
    }

    #[test]
    fn two_row_header_is_detected() {
        let grid = grid_of(&[
            &["Quarter", "Quarter"],
            &["Q1", "Q2"],
            &["10", "20"],
            &["30", "40"],
        ]);
        let spec = classify_single(&grid);
        assert_eq!(spec.header_rows, 2);
    }

    #[test]
    fn header_ceiling_bounds_classification() {
        let grid = grid_of(&[
            &["Quarter", "Quarter"],
            &["Q1", "Q2"],
            &["10", "20"],
            &["30", "40"],
        ]);
        let blocks = scanner::scan(&grid, 0);
        let spec = classify(&grid, &blocks[0], 1);
        assert_eq!(spec.header_rows, 1);
    }

    #[test]
    fn empty_corner_marks_row_header_column() {
        let grid = grid_of(&[
            &["", "Q1", "Q2"],
            &["North", "10", "20"],
            &["South", "30", "40"],
        ]);
        let spec = classify_single(&grid);
        assert_eq!(spec.header_rows, 1);
        assert_eq!(spec.header_cols, 1);
    }

    #[test]
    fn labeled_corner_keeps_leading_column_as_data() {
        let grid = grid_of(&[
            &["Region", "Q1", "Q2"],
            &["North", "10", "20"],
            &["South", "30", "40"],
        ]);
        let spec = classify_single(&grid);
        assert_eq!(spec.header_rows, 1);
        assert_eq!(spec.header_cols, 0);
    }

    #[test]
    fn headerless_block_can_still_have_row_headers() {
        let grid = grid_of(&[&["North", "10", "20"], &["South", "30", "40"]]);
        let spec = classify_single(&grid);
        assert_eq!(spec.header_rows, 0);
        assert_eq!(spec.header_cols, 1);
    }

    #[test]
    fn classification_is_deterministic() {
        let grid = grid_of(&[&["Name", "Score"], &["Alice", "90"], &["Bob", "85"]]);
        let blocks = scanner::scan(&grid, 0);
        let first = classify(&grid, &blocks[0], 2);
        let second = classify(&grid, &blocks[0], 2);
        assert_eq!(first, second);
    }
}

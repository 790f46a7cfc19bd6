//! Conversions between 0-based grid indexes and Excel-style references.

/// Converts 0-based row & column indexes to an Excel-style cell reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let row = (row + 1).to_string();
    let mut col: u32 = col as u32 + 1;
    let mut reference = String::new();
    while col > 0 {
        col -= 1;
        let digit = char::from_u32(65 + col % 26).expect("Latin letters");
        col /= 26;
        reference.insert(0, digit);
    }
    reference.push_str(row.as_str());
    reference
}

/// Converts an upper-case column label ("A", "AB") to a 0-based index.
/// Returns None for the empty string.
pub(crate) fn col_to_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for character in label.chars() {
        index = index * 26 + (character as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

/// Converts a 1-based row label ("1", "10") to a 0-based index.
/// Returns None for the empty string or a zero row.
pub(crate) fn row_to_index(label: &str) -> Option<usize> {
    label
        .parse::<usize>()
        .ok()
        .filter(|row| *row >= 1)
        .map(|row| row - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_round_trip() {
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(9, 25), "Z10");
        assert_eq!(index_to_reference(1, 26), "AA2");

        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("Z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index(""), None);

        assert_eq!(row_to_index("1"), Some(0));
        assert_eq!(row_to_index("10"), Some(9));
        assert_eq!(row_to_index(""), None);
        assert_eq!(row_to_index("0"), None);
    }
}

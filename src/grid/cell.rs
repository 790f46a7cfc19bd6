use crate::grid::reference::index_to_reference;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;

/// Spreadsheet error literals recognized during value inference.
const ERROR_LITERALS: [&str; 9] = [
    "#NULL!",
    "#DIV/0!",
    "#VALUE!",
    "#REF!",
    "#NAME?",
    "#NUM!",
    "#N/A",
    "#GETTING_DATA",
    "#ERROR!",
];

/// Tagged cell value as read from a worksheet.
///
/// Every cell carries exactly one of these variants; absence of a cell in a
/// [`Grid`](crate::grid::Grid) is equivalent to `Empty`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    /// Free-form text
    Text(String),
    /// Numeric values, integers included
    Number(f64),
    /// Boolean values (true/false)
    Boolean(bool),
    /// Date, time and date-time values
    DateTime(NaiveDateTime),
    /// Formula error literals such as `#DIV/0!`
    Error(String),
}

/// Type tag of a cell value, used by the header classifier and the sinks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Empty,
    Text,
    Number,
    Boolean,
    DateTime,
    Error,
}

impl CellType {
    /// Returns the string representation of the cell type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Error => "error",
        }
    }

    /// Returns true for textual values.
    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Returns true for scalar body values (numeric, boolean or date/time),
    /// the kinds a header label is expected to sit above.
    pub(crate) fn is_scalar(&self) -> bool {
        matches!(self, Self::Number | Self::Boolean | Self::DateTime)
    }
}

impl CellValue {
    /// Returns the type tag of this value.
    pub fn kind(&self) -> CellType {
        match self {
            Self::Empty => CellType::Empty,
            Self::Text(_) => CellType::Text,
            Self::Number(_) => CellType::Number,
            Self::Boolean(_) => CellType::Boolean,
            Self::DateTime(_) => CellType::DateTime,
            Self::Error(_) => CellType::Error,
        }
    }

    /// Returns true if this is the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Infers a typed value from raw text.
    ///
    /// Recognizes, in order: blanks, boolean literals, spreadsheet error
    /// literals, finite numbers, and ISO 8601 dates and date-times. Anything
    /// else stays text. Inference is a pure function of the input string.
    pub fn parse(text: &str) -> CellValue {
        let text = text.trim();
        if text.is_empty() {
            return Self::Empty;
        }
        match text {
            "true" | "True" | "TRUE" => return Self::Boolean(true),
            "false" | "False" | "FALSE" => return Self::Boolean(false),
            _ => (),
        }
        if ERROR_LITERALS.contains(&text) {
            return Self::Error(text.to_owned());
        }
        if text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.') {
            if let Ok(number) = text.parse::<f64>() {
                if number.is_finite() {
                    return Self::Number(number);
                }
            }
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                return Self::DateTime(datetime);
            }
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
                return Self::DateTime(datetime);
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Self::DateTime(date.and_hms_opt(0, 0, 0).expect("Midnight literal"));
            }
        }
        Self::Text(text.to_owned())
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(value) => write!(f, "{}", value),
            Self::Number(value) => {
                // Integral numbers print without the trailing ".0"
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }
            Self::Boolean(value) => write!(f, "{}", value),
            Self::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Error(value) => write!(f, "{}", value),
        }
    }
}

/// A single worksheet cell with position and typed value.
/// Immutable once read from the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
    /// Typed cell value
    pub value: CellValue,
}

impl Cell {
    /// Returns the type tag of the cell value.
    pub fn kind(&self) -> CellType {
        self.value.kind()
    }

    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}

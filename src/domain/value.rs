//! Row identifiers and cell values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Stable identity of a row across edits and re-sorts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A single field value in a row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Rank of the value's kind when comparing across kinds.
    /// Ints and floats share a rank so they compare numerically.
    fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Total ordering used by sorting.
    ///
    /// Numbers compare numerically, text lexicographically and `false < true`.
    /// Values of different kinds order as `Null < Bool < number < Text`.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Int(a), Self::Float(b)) => int_float_cmp(*a, *b),
            (Self::Float(a), Self::Int(b)) => int_float_cmp(*b, *a).reverse(),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Convert user input into a value shaped like `original`.
    ///
    /// Input is trimmed. Input that parses as the original's kind keeps that
    /// kind; anything else is stored as text. Blank input clears the cell,
    /// except that an empty text cell stays empty text.
    pub fn from_input(original: Option<&CellValue>, input: &str) -> Self {
        let trimmed = input.trim();
        let text = || Self::Text(trimmed.to_string());

        if trimmed.is_empty() {
            return match original {
                Some(Self::Text(s)) if s.is_empty() => text(),
                _ => Self::Null,
            };
        }

        match original {
            Some(Self::Int(_)) => trimmed.parse().map(Self::Int).unwrap_or_else(|_| text()),
            Some(Self::Float(_)) => trimmed.parse().map(Self::Float).unwrap_or_else(|_| text()),
            Some(Self::Bool(_)) => trimmed.parse().map(Self::Bool).unwrap_or_else(|_| text()),
            _ => text(),
        }
    }

    /// Text shown in a table cell
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Exact comparison of an integer with a float.
///
/// Rounding `a` to `f64` is monotonic, so the rounded comparison is right
/// unless it ties; a tie means `b` holds an integer value, compared exactly.
fn int_float_cmp(a: i64, b: f64) -> Ordering {
    match (a as f64).total_cmp(&b) {
        Ordering::Equal => i128::from(a).cmp(&(b as i128)),
        ord => ord,
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparison_mixes_ints_and_floats() {
        assert_eq!(CellValue::Int(2).compare(&CellValue::Float(2.5)), Ordering::Less);
        assert_eq!(CellValue::Float(3.0).compare(&CellValue::Int(3)), Ordering::Equal);
        assert_eq!(CellValue::Int(10).compare(&CellValue::Int(9)), Ordering::Greater);
    }

    #[test]
    fn test_large_ints_compare_exactly_with_floats() {
        let big = 1i64 << 53;
        let float = CellValue::Float(big as f64);

        assert_eq!(CellValue::Int(big).compare(&float), Ordering::Equal);
        // big + 1 rounds to the same f64 but is still larger
        assert_eq!(CellValue::Int(big + 1).compare(&float), Ordering::Greater);
        assert_eq!(float.compare(&CellValue::Int(big + 1)), Ordering::Less);
        assert_eq!(CellValue::Int(-big - 1).compare(&CellValue::Float(-big as f64)), Ordering::Less);
        assert_eq!(CellValue::Int(i64::MAX).compare(&CellValue::Float(i64::MAX as f64)), Ordering::Less);
        assert_eq!(CellValue::Int(0).compare(&CellValue::Float(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn test_text_is_lexicographic() {
        let bob = CellValue::from("Bob Johnson");
        let jane = CellValue::from("Jane Smith");
        assert_eq!(bob.compare(&jane), Ordering::Less);
        // Lexicographic, not numeric
        assert_eq!(CellValue::from("10").compare(&CellValue::from("9")), Ordering::Less);
    }

    #[test]
    fn test_cross_kind_order() {
        let ordered = [
            CellValue::Null,
            CellValue::Bool(true),
            CellValue::Int(-5),
            CellValue::from("a"),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(pair[0].compare(&pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn test_from_input_keeps_kind() {
        let int = CellValue::Int(1);
        assert_eq!(CellValue::from_input(Some(&int), " 42 "), CellValue::Int(42));
        assert_eq!(
            CellValue::from_input(Some(&int), "forty"),
            CellValue::from("forty")
        );
        assert_eq!(
            CellValue::from_input(Some(&CellValue::Bool(false)), "true"),
            CellValue::Bool(true)
        );
        assert_eq!(CellValue::from_input(None, "555-1234"), CellValue::from("555-1234"));
        assert_eq!(CellValue::from_input(Some(&int), "  "), CellValue::Null);
    }

    #[test]
    fn test_from_input_trims_text() {
        let name = CellValue::from("John Doe");
        assert_eq!(
            CellValue::from_input(Some(&name), "  Johnny "),
            CellValue::from("Johnny")
        );
        assert_eq!(
            CellValue::from_input(Some(&CellValue::Int(1)), " n/a "),
            CellValue::from("n/a")
        );

        let empty = CellValue::from("");
        assert_eq!(CellValue::from_input(Some(&empty), "   "), empty);
        assert_eq!(CellValue::from_input(Some(&name), "   "), CellValue::Null);
    }

    #[test]
    fn test_row_id_from_json() {
        let ids: Vec<RowId> = serde_json::from_str(r#"[1, "a-7"]"#).unwrap();
        assert_eq!(ids, vec![RowId::Int(1), RowId::from("a-7")]);
    }

    #[test]
    fn test_cell_value_from_json() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[null, true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Int(3),
                CellValue::Float(1.5),
                CellValue::from("x"),
            ]
        );
    }
}

//! Raw row representation.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw cell as handed over by the upstream CSV reader.
///
/// Readers that keep everything as text produce [`CellValue::Text`]; readers
/// that coerce numerics produce [`CellValue::Number`]. Missing cells are
/// [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text rendering of the value. Numbers use their shortest form (`150`, `1.5`).
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// True for nulls and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Trimmed text, or `None` when the cell is blank.
    pub fn trimmed(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.as_text().trim().to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// One source row keyed by raw header string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, CellValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Value for `column`, or [`CellValue::Null`] when the column is absent.
    pub fn value(&self, column: &str) -> &CellValue {
        self.0.get(column).unwrap_or(&NULL_CELL)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, CellValue>> for Row {
    fn from(cells: BTreeMap<String, CellValue>) -> Self {
        Self(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_renders_shortest_form() {
        assert_eq!(CellValue::Number(150.0).as_text(), "150");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
    }

    #[test]
    fn blank_detection() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert_eq!(CellValue::from("  A1 ").trimmed().as_deref(), Some("A1"));
    }

    #[test]
    fn missing_column_reads_as_null() {
        let row: Row = [("id", "A1")].into_iter().collect();
        assert_eq!(row.value("id"), &CellValue::from("A1"));
        assert_eq!(row.value("other"), &CellValue::Null);
    }

    #[test]
    fn row_json_shape() {
        let mut row = Row::new();
        row.insert("a", "x");
        row.insert("b", 2.5);
        row.insert("c", CellValue::Null);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"a":"x","b":2.5,"c":null}"#);

        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}

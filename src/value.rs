//! Typed cell values and rows.
//!
//! A [`Row`] maps column keys to [`Value`]s. Each column declares the
//! [`ValueKind`] it holds, which is used to turn typed-in or imported text
//! back into a value.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Date format used when displaying and exporting dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alternative day-first format accepted when parsing dates.
pub const DAY_FIRST_DATE_FORMAT: &str = "%d/%m/%Y";

/// The kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Free text.
    #[default]
    Text,
    /// A floating point number.
    Number,
    /// A calendar date.
    Date,
    /// One of a fixed set of labels, such as a status.
    Enum,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value. Displays as the empty string.
    #[default]
    Empty,
    /// Free text.
    Text(String),
    /// A number.
    Number(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// An enumerated label.
    Enum(String),
}

impl Value {
    /// Returns true for [`Value::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// The kind this value carries, if any.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Empty => None,
            Value::Text(_) => Some(ValueKind::Text),
            Value::Number(_) => Some(ValueKind::Number),
            Value::Date(_) => Some(ValueKind::Date),
            Value::Enum(_) => Some(ValueKind::Enum),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(s) | Value::Enum(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl ValueKind {
    /// Parses text into a value of this kind.
    ///
    /// Empty text gives [`Value::Empty`], and so does whitespace for every kind
    /// but [`ValueKind::Text`]. Numbers and dates that do not parse are kept as
    /// [`Value::Text`] so no input is lost.
    ///
    /// ```rust
    /// use bubbletea_datagrid::value::{Value, ValueKind};
    ///
    /// assert_eq!(ValueKind::Number.parse("12.5"), Value::Number(12.5));
    /// assert_eq!(ValueKind::Number.parse(" "), Value::Empty);
    /// assert_eq!(ValueKind::Number.parse("n/a"), Value::Text("n/a".into()));
    /// assert_eq!(ValueKind::Text.parse("  "), Value::Text("  ".into()));
    /// ```
    pub fn parse(self, text: &str) -> Value {
        let trimmed = text.trim();
        if text.is_empty() || (trimmed.is_empty() && self != ValueKind::Text) {
            return Value::Empty;
        }
        match self {
            ValueKind::Text => Value::Text(text.to_string()),
            ValueKind::Enum => Value::Enum(trimmed.to_string()),
            ValueKind::Number => match trimmed.parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => {
                    tracing::warn!(text = trimmed, "value is not a number, keeping it as text");
                    Value::Text(text.to_string())
                }
            },
            ValueKind::Date => {
                let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                    .or_else(|_| NaiveDate::parse_from_str(trimmed, DAY_FIRST_DATE_FORMAT));
                match parsed {
                    Ok(d) => Value::Date(d),
                    Err(_) => {
                        tracing::warn!(text = trimmed, "value is not a date, keeping it as text");
                        Value::Text(text.to_string())
                    }
                }
            }
        }
    }
}

/// One record: column key to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a cell, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.cells.insert(key.into(), value.into())
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Returns the display string for a key; absent keys read as "".
    pub fn display(&self, key: &str) -> String {
        self.cells
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Returns true if the row has a value for the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.cells.iter()
    }

    /// Number of cells present.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

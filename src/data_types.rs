// src/data_types.rs
use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

/// Largest integer an f64 holds exactly; whole numbers up to this are
/// written without a fractional part.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "CSV"),
            SourceFormat::Json => write!(f, "JSON"),
        }
    }
}

/// One cell of a record.
///
/// Only `Number` takes part in statistics and charts. `Nested` keeps JSON
/// arrays and objects as they were so an exported report reproduces them.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Nested(Value),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Null and the empty string count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text shown in the raw data table: numbers with two decimals.
    pub fn table_text(&self) -> String {
        match self {
            CellValue::Number(n) => format!("{:.2}", n),
            other => other.to_string(),
        }
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Nested(Value::Number(n)),
            },
            Value::String(s) => CellValue::Text(s),
            nested => CellValue::Nested(nested),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if is_exact_integer(*n) => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Nested(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Number(n) => serialize_number(*n, serializer),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Nested(v) => v.serialize(serializer),
        }
    }
}

fn is_exact_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER
}

/// Writes `4000.0` as `4000`, everything else as a float.
pub fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if is_exact_integer(n) {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

/// Column name to value, in the order the source listed the columns.
pub type Record = IndexMap<String, CellValue>;

/// The loaded dataset. Row order is the x-axis order of the charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn empty() -> Self {
        Table {
            records: Vec::new(),
        }
    }

    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Column names as listed by the first record.
    pub fn headers(&self) -> Vec<&str> {
        self.first()
            .map(|record| record.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Numeric values of one column in table order, skipping everything else.
    pub fn numbers(&self, column: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.get(column).and_then(CellValue::as_number))
            .collect()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

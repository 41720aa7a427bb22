// src/json_handler.rs
use serde_json::{Map, Value};

use crate::data_types::{CellValue, Record, SourceFormat, Table};
use crate::error::LoadError;

pub struct JSONHandler {}

impl JSONHandler {
    pub fn new() -> Self {
        JSONHandler {}
    }

    /// Accepts an array of objects, or a single object as a one-row table.
    pub fn parse(&self, bytes: &[u8]) -> Result<Table, LoadError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| LoadError::parse(SourceFormat::Json, e))?;

        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(Self::to_record(map)),
                    other => Err(LoadError::parse(
                        SourceFormat::Json,
                        format!("element {} is {}, expected an object", i, kind(&other)),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(map) => vec![Self::to_record(map)],
            other => {
                return Err(LoadError::parse(
                    SourceFormat::Json,
                    format!("top-level value is {}, expected an array or object", kind(&other)),
                ))
            }
        };

        Ok(Table::new(records))
    }

    fn to_record(map: Map<String, Value>) -> Record {
        map.into_iter()
            .map(|(key, value)| (key, CellValue::from(value)))
            .collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

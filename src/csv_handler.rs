// src/csv_handler.rs
use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::data_types::{CellValue, Record, SourceFormat, Table};
use crate::error::LoadError;

pub struct CSVHandler {}

impl CSVHandler {
    pub fn new() -> Self {
        CSVHandler {}
    }

    /// Parses CSV bytes with the first row as column names.
    ///
    /// Rows whose cells are all empty are dropped. A short row lacks the
    /// missing columns; cells beyond the header width are ignored.
    pub fn parse(&self, bytes: &[u8]) -> Result<Table, LoadError> {
        let delimiter = Self::detect_delimiter(bytes);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoadError::parse(SourceFormat::Csv, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let headers = Self::dedupe_headers(headers);

        let mut records = Vec::new();
        let mut blank_rows = 0usize;
        let mut surplus_cells = 0usize;

        for result in reader.records() {
            let row = result.map_err(|e| LoadError::parse(SourceFormat::Csv, e))?;
            surplus_cells += row.len().saturating_sub(headers.len());

            let record = Self::to_record(&headers, &row);
            if record.values().all(CellValue::is_blank) {
                blank_rows += 1;
                continue;
            }
            records.push(record);
        }

        if blank_rows > 0 {
            debug!(blank_rows, "dropped blank CSV rows");
        }
        if surplus_cells > 0 {
            warn!(surplus_cells, "ignored CSV cells beyond the header width");
        }

        Ok(Table::new(records))
    }

    /// Repeated names get `_1`, `_2`, ... so no column overwrites another.
    fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
        let mut taken: HashSet<String> = headers.iter().cloned().collect();
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(headers.len());

        for header in headers {
            if seen.insert(header.clone()) {
                unique.push(header);
                continue;
            }
            let mut suffix = 1;
            let renamed = loop {
                let candidate = format!("{}_{}", header, suffix);
                if !taken.contains(&candidate) {
                    break candidate;
                }
                suffix += 1;
            };
            warn!(header = %header, renamed = %renamed, "renamed repeated CSV header");
            taken.insert(renamed.clone());
            seen.insert(renamed.clone());
            unique.push(renamed);
        }
        unique
    }

    fn to_record(headers: &[String], row: &StringRecord) -> Record {
        headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| (header.clone(), Self::coerce(field)))
            .collect()
    }

    /// Types a raw cell: booleans, numeric literals, empty as null, else text.
    pub fn coerce(field: &str) -> CellValue {
        match field {
            "" => CellValue::Null,
            "true" | "TRUE" => CellValue::Bool(true),
            "false" | "FALSE" => CellValue::Bool(false),
            _ => match Self::parse_number(field) {
                Some(n) => CellValue::Number(n),
                None => CellValue::Text(field.to_string()),
            },
        }
    }

    // Accepts `-12`, `3.`, `.5`, `1.5e-3`; rejects `+1`, `inf`, `nan`, `0x10`.
    fn parse_number(field: &str) -> Option<f64> {
        let trimmed = field.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let mut chars = digits.chars();
        let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '.');
        let body_ok = digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'));
        if !starts_ok || !body_ok {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    fn detect_delimiter(bytes: &[u8]) -> u8 {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
        if first_line.contains(&b';') {
            b';'
        } else {
            b','
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Table {
        CSVHandler::new().parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn header_row_names_columns_and_cells_are_typed() {
        let table = parse("month,sales,active,note\nJan,4000,true,\nFeb,-2.5,FALSE,late\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), vec!["month", "sales", "active", "note"]);

        let first = &table.records[0];
        assert_eq!(first["month"], CellValue::Text("Jan".into()));
        assert_eq!(first["sales"], CellValue::Number(4000.0));
        assert_eq!(first["active"], CellValue::Bool(true));
        assert_eq!(first["note"], CellValue::Null);

        let second = &table.records[1];
        assert_eq!(second["sales"], CellValue::Number(-2.5));
        assert_eq!(second["active"], CellValue::Bool(false));
        assert_eq!(second["note"], CellValue::Text("late".into()));
    }

    #[test]
    fn trailing_blank_rows_are_dropped() {
        let table = parse("a,b\n1,2\n3,4\n,\n\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.last().unwrap()["a"], CellValue::Number(3.0));
    }

    #[test]
    fn ambiguous_literals_stay_text() {
        for raw in ["+1", "inf", "NaN", "0x10", "1,000", "12abc", "-", "e5"] {
            assert_eq!(CSVHandler::coerce(raw), CellValue::Text(raw.into()), "{raw}");
        }
        assert_eq!(CSVHandler::coerce(".5"), CellValue::Number(0.5));
        assert_eq!(CSVHandler::coerce("3."), CellValue::Number(3.0));
        assert_eq!(CSVHandler::coerce("1.5e3"), CellValue::Number(1500.0));
        assert_eq!(CSVHandler::coerce("True"), CellValue::Text("True".into()));
    }

    #[test]
    fn repeated_headers_keep_every_cell() {
        let table = parse("a,a,b\n1,2,3\n");
        assert_eq!(table.headers(), vec!["a", "a_1", "b"]);
        let row = &table.records[0];
        assert_eq!(row["a"], CellValue::Number(1.0));
        assert_eq!(row["a_1"], CellValue::Number(2.0));
        assert_eq!(row["b"], CellValue::Number(3.0));
    }

    #[test]
    fn renamed_headers_skip_names_already_in_use() {
        let table = parse("a,a,a_1,a\n1,2,3,4\n");
        assert_eq!(table.headers(), vec!["a", "a_2", "a_1", "a_3"]);
        assert_eq!(table.records[0].len(), 4);
        assert_eq!(table.records[0]["a_1"], CellValue::Number(3.0));
    }

    #[test]
    fn semicolon_header_selects_semicolon_delimiter() {
        let table = parse("name;score\nAda;9\n");
        assert_eq!(table.records[0]["score"], CellValue::Number(9.0));
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let table = parse("a,b,c\n1,2\n4,5,6,7\n");
        assert_eq!(table.len(), 2);
        assert!(!table.records[0].contains_key("c"));
        assert_eq!(table.records[1].len(), 3);
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bytes = b"a,b\n1,\xff\xfe\n";
        let err = CSVHandler::new().parse(bytes).unwrap_err();
        assert!(matches!(err, LoadError::Parse { format: SourceFormat::Csv, .. }));
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        assert!(parse("").is_empty());
        assert!(parse("a,b\n").is_empty());
    }
}

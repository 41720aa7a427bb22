// src/schema.rs
use crate::data_types::Table;

/// Column roles derived from the first record only.
///
/// Later rows are not inspected: a column that is numeric in the first row
/// but text further down is still numeric, and its text cells are simply
/// skipped by the statistics and charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub numeric_columns: Vec<String>,
    pub category_column: Option<String>,
}

impl Schema {
    pub fn infer(table: &Table) -> Self {
        let Some(first) = table.first() else {
            return Schema::default();
        };

        let numeric_columns = first
            .iter()
            .filter(|(_, value)| value.is_number())
            .map(|(key, _)| key.clone())
            .collect();
        let category_column = first
            .iter()
            .find(|(_, value)| !value.is_number())
            .map(|(key, _)| key.clone());

        Schema {
            numeric_columns,
            category_column,
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }
}

// src/report.rs
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::data_types::Table;
use crate::error::ExportError;
use crate::statistics::Statistic;

/// Name written into reports made from the built-in table.
pub const SAMPLE_SOURCE_NAME: &str = "sample-data";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub file_name: String,
    pub date: String,
    pub data_count: usize,
    pub statistics: IndexMap<String, Statistic>,
    pub data: &'a Table,
}

impl<'a> Report<'a> {
    pub fn new(
        source_name: Option<&str>,
        generated_at: DateTime<Utc>,
        statistics: IndexMap<String, Statistic>,
        table: &'a Table,
    ) -> Self {
        Report {
            file_name: source_name.unwrap_or(SAMPLE_SOURCE_NAME).to_string(),
            date: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            data_count: table.len(),
            statistics,
            data: table,
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn render(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `report-<epoch-millis>.json`
pub fn report_file_name(generated_at: DateTime<Utc>) -> String {
    format!("report-{}.json", generated_at.timestamp_millis())
}

pub fn write_report(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents.as_bytes())?;
    info!(path = %path.display(), bytes = contents.len(), "wrote report");
    Ok(())
}

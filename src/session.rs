// src/session.rs
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::chart_data::{self, ChartData, ChartMode};
use crate::data_types::Table;
use crate::error::LoadError;
use crate::loader::LoadedTable;
use crate::report::Report;
use crate::sample::sample_table;
use crate::schema::Schema;
use crate::statistics::{self, Statistic};

/// Everything the window shows is derived from this on demand.
#[derive(Debug, Clone)]
pub struct Session {
    table: Table,
    source_name: Option<String>,
    chart_mode: ChartMode,
    selected_metrics: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        let mut session = Session {
            table: Table::empty(),
            source_name: None,
            chart_mode: ChartMode::default(),
            selected_metrics: Vec::new(),
        };
        session.load_sample();
        session
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn chart_mode(&self) -> ChartMode {
        self.chart_mode
    }

    pub fn selected_metrics(&self) -> &[String] {
        &self.selected_metrics
    }

    pub fn is_selected(&self, metric: &str) -> bool {
        self.selected_metrics.iter().any(|m| m == metric)
    }

    pub fn load_sample(&mut self) {
        self.replace(sample_table(), None);
    }

    /// Swaps in a freshly loaded table and selects all of its numeric columns.
    pub fn replace_table(&mut self, table: Table, source_name: impl Into<String>) {
        self.replace(table, Some(source_name.into()));
    }

    /// Applies the outcome of a file load. On error nothing changes and the
    /// error is handed back for display.
    pub fn apply_load(&mut self, result: Result<LoadedTable, LoadError>) -> Result<(), LoadError> {
        match result {
            Ok(loaded) => {
                self.replace_table(loaded.table, loaded.file_name);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, records = self.table.len(), "load failed, keeping current table");
                Err(err)
            }
        }
    }

    fn replace(&mut self, table: Table, source_name: Option<String>) {
        self.table = table;
        self.source_name = source_name;
        self.selected_metrics = self.schema().numeric_columns;
        debug!(
            records = self.table.len(),
            metrics = ?self.selected_metrics,
            "table replaced"
        );
    }

    pub fn set_chart_mode(&mut self, mode: ChartMode) {
        self.chart_mode = mode;
    }

    /// Deselects a metric, or appends it to the end of the selection.
    pub fn toggle_metric(&mut self, metric: &str) {
        if let Some(pos) = self.selected_metrics.iter().position(|m| m == metric) {
            self.selected_metrics.remove(pos);
        } else if self.schema().is_numeric(metric) {
            self.selected_metrics.push(metric.to_string());
        }
    }

    pub fn schema(&self) -> Schema {
        Schema::infer(&self.table)
    }

    pub fn statistics(&self) -> IndexMap<String, Statistic> {
        statistics::compute(&self.table, &self.schema().numeric_columns)
    }

    pub fn chart_data(&self) -> ChartData {
        chart_data::build(
            &self.table,
            &self.schema(),
            self.chart_mode,
            &self.selected_metrics,
        )
    }

    pub fn report(&self, generated_at: DateTime<Utc>) -> Report<'_> {
        Report::new(
            self.source_name(),
            generated_at,
            self.statistics(),
            &self.table,
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::SourceFormat;
    use crate::loader::load_file;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn starts_with_sample_and_all_metrics_selected() {
        let session = Session::new();
        assert_eq!(session.table().len(), 12);
        assert_eq!(session.source_name(), None);
        assert_eq!(session.selected_metrics(), ["sales", "expenses", "profit"]);
        assert_eq!(session.chart_mode(), ChartMode::Line);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session.toggle_metric("expenses");
        let before = session.table().clone();

        let broken = write_file(&dir, "bad.json", b"[{\"a\": 1");
        let err = session.apply_load(load_file(broken).await).unwrap_err();
        assert!(matches!(err, LoadError::Parse { format: SourceFormat::Json, .. }));

        let unsupported = write_file(&dir, "sheet.xlsx", b"a,b\n1,2\n");
        let err = session.apply_load(load_file(unsupported).await).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));

        assert_eq!(session.table(), &before);
        assert_eq!(session.source_name(), None);
        assert_eq!(session.selected_metrics(), ["sales", "profit"]);
    }

    #[tokio::test]
    async fn loading_replaces_table_and_resets_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session.set_chart_mode(ChartMode::Bar);

        let path = write_file(&dir, "scores.csv", b"team,points,wins\nA,10,2\nB,12,3\n\n");
        session.apply_load(load_file(path).await).unwrap();

        assert_eq!(session.table().len(), 2);
        assert_eq!(session.source_name(), Some("scores.csv"));
        assert_eq!(session.selected_metrics(), ["points", "wins"]);
        assert_eq!(session.chart_mode(), ChartMode::Bar);
        assert_eq!(session.report(Utc::now()).file_name, "scores.csv");

        session.load_sample();
        assert_eq!(session.source_name(), None);
        assert_eq!(session.selected_metrics(), ["sales", "expenses", "profit"]);
    }

    #[test]
    fn toggling_removes_then_appends() {
        let mut session = Session::new();
        session.toggle_metric("sales");
        assert_eq!(session.selected_metrics(), ["expenses", "profit"]);
        session.toggle_metric("sales");
        assert_eq!(session.selected_metrics(), ["expenses", "profit", "sales"]);
        session.toggle_metric("month");
        assert!(!session.is_selected("month"));
    }

    #[test]
    fn toggle_changes_series_but_not_table() {
        let mut session = Session::new();
        let table = session.table().clone();
        session.toggle_metric("expenses");
        let ChartData::Line(data) = session.chart_data() else {
            panic!("expected line data");
        };
        let names: Vec<_> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sales", "profit"]);
        assert_eq!(session.table(), &table);
    }

    #[test]
    fn empty_table_derives_empty_results() {
        let mut session = Session::new();
        session.replace_table(Table::empty(), "empty.json");
        assert!(session.statistics().is_empty());
        assert!(session.selected_metrics().is_empty());
        session.set_chart_mode(ChartMode::Pie);
        assert_eq!(session.chart_data(), ChartData::Pie(Vec::new()));
        assert_eq!(session.report(Utc::now()).data_count, 0);
    }
}

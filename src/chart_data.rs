// src/chart_data.rs
use serde::Serialize;

use crate::data_types::{CellValue, Table};
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMode {
    #[default]
    Line,
    Bar,
    Pie,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [ChartMode::Line, ChartMode::Bar, ChartMode::Pie];

    pub fn label(&self) -> &'static str {
        match self {
            ChartMode::Line => "Line",
            ChartMode::Bar => "Bar",
            ChartMode::Pie => "Pie",
        }
    }
}

/// One drawn metric. `None` marks rows where the column holds no number.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Rows of the table projected onto the category axis and selected metrics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Line(SeriesData),
    Bar(SeriesData),
    Pie(Vec<PieSlice>),
}

pub fn build(table: &Table, schema: &Schema, mode: ChartMode, selected: &[String]) -> ChartData {
    match mode {
        ChartMode::Line => ChartData::Line(series_data(table, schema, selected)),
        ChartMode::Bar => ChartData::Bar(series_data(table, schema, selected)),
        ChartMode::Pie => ChartData::Pie(pie_data(table, schema)),
    }
}

/// Every row stays; the selection only decides which series exist and in
/// which order.
pub fn series_data(table: &Table, schema: &Schema, selected: &[String]) -> SeriesData {
    let labels = table
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| match &schema.category_column {
            Some(category) => record.get(category).map(ToString::to_string).unwrap_or_default(),
            None => (i + 1).to_string(),
        })
        .collect();

    let series = selected
        .iter()
        .filter(|name| schema.is_numeric(name))
        .map(|name| Series {
            name: name.clone(),
            values: table
                .records
                .iter()
                .map(|record| record.get(name).and_then(CellValue::as_number))
                .collect(),
        })
        .collect();

    SeriesData { labels, series }
}

/// One slice per numeric column, sized by the magnitude of its value in the
/// last row. Zero and non-numeric last values get no slice.
pub fn pie_data(table: &Table, schema: &Schema) -> Vec<PieSlice> {
    let Some(last) = table.last() else {
        return Vec::new();
    };

    schema
        .numeric_columns
        .iter()
        .filter_map(|name| {
            let value = last.get(name).and_then(CellValue::as_number)?.abs();
            (value > 0.0).then(|| PieSlice {
                name: name.clone(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Record;
    use crate::sample::sample_table;

    fn names(selected: &[&str]) -> Vec<String> {
        selected.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pie_uses_absolute_last_values_and_skips_zero() {
        let table = Table::new(vec![
            Record::from([
                ("a".to_string(), CellValue::Number(1.0)),
                ("b".to_string(), CellValue::Number(1.0)),
                ("c".to_string(), CellValue::Number(1.0)),
            ]),
            Record::from([
                ("a".to_string(), CellValue::Number(5.0)),
                ("b".to_string(), CellValue::Number(0.0)),
                ("c".to_string(), CellValue::Number(-3.0)),
            ]),
        ]);
        let schema = Schema::infer(&table);
        let pie = pie_data(&table, &schema);
        assert_eq!(
            serde_json::to_value(&pie).unwrap(),
            serde_json::json!([{"name": "a", "value": 5.0}, {"name": "c", "value": 3.0}])
        );
    }

    #[test]
    fn pie_ignores_selection() {
        let table = sample_table();
        let schema = Schema::infer(&table);
        let ChartData::Pie(slices) = build(&table, &schema, ChartMode::Pie, &[]) else {
            panic!("expected pie data");
        };
        let slice_names: Vec<_> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(slice_names, vec!["sales", "expenses", "profit"]);
    }

    #[test]
    fn pie_of_empty_table_is_empty() {
        assert!(pie_data(&Table::empty(), &Schema::default()).is_empty());
    }

    #[test]
    fn deselecting_removes_exactly_one_series() {
        let table = sample_table();
        let schema = Schema::infer(&table);
        let all = series_data(&table, &schema, &names(&["sales", "expenses", "profit"]));
        let fewer = series_data(&table, &schema, &names(&["sales", "profit"]));

        assert_eq!(all.labels, fewer.labels);
        assert_eq!(fewer.series.len(), 2);
        assert_eq!(fewer.series[0], all.series[0]);
        assert_eq!(fewer.series[1], all.series[2]);
        assert_eq!(table, sample_table());
    }

    #[test]
    fn series_follow_selection_order_and_category_labels() {
        let table = sample_table();
        let schema = Schema::infer(&table);
        let data = series_data(&table, &schema, &names(&["profit", "sales", "unknown"]));
        assert_eq!(data.labels.first().map(String::as_str), Some("1月"));
        assert_eq!(data.labels.len(), 12);
        let order: Vec<_> = data.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["profit", "sales"]);
        assert_eq!(data.series[0].values[2], Some(-7800.0));
    }

    #[test]
    fn rows_without_numbers_become_gaps_and_labels_fall_back_to_row_number() {
        let table = Table::new(vec![
            Record::from([("v".to_string(), CellValue::Number(1.0))]),
            Record::from([("v".to_string(), CellValue::Text("?".into()))]),
        ]);
        let schema = Schema::infer(&table);
        let data = series_data(&table, &schema, &names(&["v"]));
        assert_eq!(data.labels, vec!["1", "2"]);
        assert_eq!(data.series[0].values, vec![Some(1.0), None]);
    }
}

// src/statistics.rs
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::data_types::{serialize_number, Table};

/// Aggregates of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistic {
    #[serde(serialize_with = "number")]
    pub average: f64,
    /// Upper-middle order statistic, `sorted[n / 2]`; never an average of two values.
    #[serde(serialize_with = "number")]
    pub median: f64,
    #[serde(serialize_with = "number")]
    pub min: f64,
    #[serde(serialize_with = "number")]
    pub max: f64,
    #[serde(serialize_with = "number")]
    pub sum: f64,
    /// Last value minus first value in table order; 0 for a single value.
    #[serde(serialize_with = "number")]
    pub trend: f64,
}

fn number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serialize_number(*n, serializer)
}

impl Statistic {
    /// `None` for an empty value set.
    ///
    /// `sum` can overflow to infinity for huge inputs; the report then
    /// writes it as `null`. `average` does not overflow.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (first, last) = (*values.first()?, *values.last()?);

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let sum: f64 = values.iter().sum();
        Some(Statistic {
            average: running_mean(values),
            median: sorted[sorted.len() / 2],
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            sum,
            trend: last - first,
        })
    }
}

// Incremental mean stays finite when the plain sum would overflow.
fn running_mean(values: &[f64]) -> f64 {
    values
        .iter()
        .enumerate()
        .fold(0.0, |mean, (i, v)| mean + (v - mean) / (i + 1) as f64)
}

/// Column name to statistic, in `columns` order.
///
/// Columns without a single numeric value are left out.
pub fn compute(table: &Table, columns: &[String]) -> IndexMap<String, Statistic> {
    columns
        .iter()
        .filter_map(|column| {
            let values = table.numbers(column);
            Statistic::from_values(&values).map(|stat| (column.clone(), stat))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::{CellValue, Record};
    use crate::sample::sample_table;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn median_is_upper_middle_element() {
        let stat = Statistic::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stat.median, 3.0);
        let odd = Statistic::from_values(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(odd.median, 3.0);
    }

    #[test]
    fn trend_follows_table_order_not_sorted_order() {
        let stat = Statistic::from_values(&[10.0, 50.0, 2.0]).unwrap();
        assert_eq!(stat.trend, -8.0);
        assert_eq!(stat.min, 2.0);
        assert_eq!(stat.max, 50.0);
    }

    #[test]
    fn single_value_has_zero_trend() {
        let stat = Statistic::from_values(&[7.0]).unwrap();
        assert_eq!(stat.trend, 0.0);
        assert_eq!(stat.average, 7.0);
        assert_eq!(stat.median, 7.0);
    }

    #[test]
    fn empty_values_yield_nothing() {
        assert!(Statistic::from_values(&[]).is_none());
    }

    #[test]
    fn ordering_and_sum_properties_hold() {
        let sets: [&[f64]; 4] = [
            &[1.0],
            &[-3.5, 2.25, 9.0, 0.0],
            &[1e6, 3.0, -1e-3, 42.0, 42.0],
            &[0.1, 0.2, 0.3],
        ];
        for values in sets {
            let stat = Statistic::from_values(values).unwrap();
            assert!(stat.min <= stat.median && stat.median <= stat.max);
            assert!(close(stat.sum, stat.average * values.len() as f64));
        }
    }

    #[test]
    fn average_survives_sum_overflow() {
        let stat = Statistic::from_values(&[1e308, 1e308]).unwrap();
        assert_eq!(stat.average, 1e308);
        assert_eq!(stat.median, 1e308);
        assert!(stat.sum.is_infinite());

        let value = serde_json::to_value(stat).unwrap();
        assert_eq!(value["average"], 1e308);
        assert!(value["sum"].is_null());
    }

    #[test]
    fn sample_sales_column() {
        let table = sample_table();
        let stats = compute(&table, &["sales".to_string()]);
        let sales = stats["sales"];
        assert_eq!(sales.trend, 3200.0);
        assert_eq!(sales.sum, 48050.0);
        assert_eq!(sales.min, 1890.0);
        assert_eq!(sales.max, 7200.0);
        assert_eq!(sales.median, 4000.0);
    }

    #[test]
    fn non_numeric_cells_are_excluded_not_zeroed() {
        let rows = [
            CellValue::Number(10.0),
            CellValue::Text("n/a".into()),
            CellValue::Null,
            CellValue::Number(20.0),
        ];
        let table = Table::new(
            rows.iter()
                .map(|v| Record::from([("x".to_string(), v.clone())]))
                .collect(),
        );
        let stats = compute(&table, &["x".to_string(), "missing".to_string()]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["x"].average, 15.0);
        assert_eq!(stats["x"].trend, 10.0);
    }

    #[test]
    fn serializes_whole_numbers_as_integers() {
        let stat = Statistic::from_values(&[1.0, 2.0]).unwrap();
        let text = serde_json::to_string(&stat).unwrap();
        assert_eq!(
            text,
            r#"{"average":1.5,"median":2,"min":1,"max":2,"sum":3,"trend":1}"#
        );
    }
}

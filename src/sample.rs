// src/sample.rs
use crate::data_types::{CellValue, Record, Table};

const SAMPLE_ROWS: [(&str, f64, f64, f64); 12] = [
    ("1月", 4000.0, 2400.0, 1600.0),
    ("2月", 3000.0, 1398.0, 1602.0),
    ("3月", 2000.0, 9800.0, -7800.0),
    ("4月", 2780.0, 3908.0, -1128.0),
    ("5月", 1890.0, 4800.0, -2910.0),
    ("6月", 2390.0, 3800.0, -1410.0),
    ("7月", 3490.0, 4300.0, -810.0),
    ("8月", 4200.0, 2100.0, 2100.0),
    ("9月", 5100.0, 2800.0, 2300.0),
    ("10月", 6200.0, 3200.0, 3000.0),
    ("11月", 5800.0, 3100.0, 2700.0),
    ("12月", 7200.0, 3500.0, 3700.0),
];

/// Built-in monthly table with `month`, `sales`, `expenses` and `profit`.
pub fn sample_table() -> Table {
    let records = SAMPLE_ROWS
        .iter()
        .map(|(month, sales, expenses, profit)| {
            Record::from([
                ("month".to_string(), CellValue::Text(month.to_string())),
                ("sales".to_string(), CellValue::Number(*sales)),
                ("expenses".to_string(), CellValue::Number(*expenses)),
                ("profit".to_string(), CellValue::Number(*profit)),
            ])
        })
        .collect();
    Table::new(records)
}

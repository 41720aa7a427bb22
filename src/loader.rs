// src/loader.rs
use std::path::{Path, PathBuf};

use tokio::task;
use tracing::{info, warn};

use crate::csv_handler::CSVHandler;
use crate::data_types::{SourceFormat, Table};
use crate::error::LoadError;
use crate::json_handler::JSONHandler;

/// A table read from disk together with the name it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub file_name: String,
    pub table: Table,
}

pub fn parse_bytes(format: SourceFormat, bytes: &[u8]) -> Result<Table, LoadError> {
    match format {
        SourceFormat::Csv => CSVHandler::new().parse(bytes),
        SourceFormat::Json => JSONHandler::new().parse(bytes),
    }
}

/// Reads and parses a `.csv` or `.json` file on a blocking worker.
pub async fn load_file(path: PathBuf) -> Result<LoadedTable, LoadError> {
    let file_name = display_name(&path);
    let join_name = file_name.clone();

    let result = task::spawn_blocking(move || read_and_parse(&path))
        .await
        .unwrap_or_else(|e| {
            Err(LoadError::Io {
                file_name: join_name,
                message: e.to_string(),
            })
        });

    match result {
        Ok(table) => {
            info!(file = %file_name, records = table.len(), "loaded table");
            Ok(LoadedTable { file_name, table })
        }
        Err(err) => {
            warn!(file = %file_name, error = %err, "rejected file");
            Err(err)
        }
    }
}

fn read_and_parse(path: &Path) -> Result<Table, LoadError> {
    let format = SourceFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        file_name: display_name(path),
    })?;

    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        file_name: display_name(path),
        message: e.to_string(),
    })?;

    parse_bytes(format, &bytes)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// src/services/csv_export.rs
use anyhow::Result;
use csv::Writer;
use log::debug;

use crate::models::Table;

pub const DEFAULT_FILE_NAME: &str = "dados";

/// UTF-8 CSV of the table: one header row in column order, no index column.
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(table.columns.iter().map(|c| c.name()))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    debug!("Encoded {} rows into {} CSV bytes", table.rows.len(), bytes.len());
    Ok(bytes)
}

/// Download name for the export; blank input falls back to the default.
pub fn export_filename(name: Option<&str>) -> String {
    let stem = name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);
    format!("{}.csv", stem)
}

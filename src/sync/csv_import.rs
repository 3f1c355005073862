//! CSV table/column import
//!
//! Input is a header row naming `table_name` and `column_name` (exact,
//! case-sensitive) and one row per column. Rows with either field empty are
//! skipped. Parsing finishes before anything is built, so a malformed file
//! never yields a partial import.

use crate::error::{validation_error, AppError};
use crate::ids::{IdAllocator, IdKind};
use crate::models::{Column, Position, Table};
use std::collections::HashMap;

pub const TABLE_NAME_HEADER: &str = "table_name";
pub const COLUMN_NAME_HEADER: &str = "column_name";

/// Default horizontal gap between imported tables
pub const DEFAULT_IMPORT_SPACING: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub table_name: String,
    pub column_name: String,
}

pub struct CsvImporter;

impl CsvImporter {
    /// Parse CSV text into usable records.
    pub fn parse(content: &str) -> Result<Vec<ImportRecord>, AppError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let table_idx = headers.iter().position(|h| h == TABLE_NAME_HEADER);
        let column_idx = headers.iter().position(|h| h == COLUMN_NAME_HEADER);
        let (Some(table_idx), Some(column_idx)) = (table_idx, column_idx) else {
            return Err(validation_error(format!(
                "CSV header must contain '{}' and '{}' columns",
                TABLE_NAME_HEADER, COLUMN_NAME_HEADER
            )));
        };

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let table_name = row.get(table_idx).unwrap_or("");
            let column_name = row.get(column_idx).unwrap_or("");
            if table_name.is_empty() || column_name.is_empty() {
                continue;
            }
            records.push(ImportRecord {
                table_name: table_name.to_string(),
                column_name: column_name.to_string(),
            });
        }

        Ok(records)
    }

    /// Group records into new tables, keeping first-seen table order and row
    /// order within each table. Tables are laid out left to right from
    /// `start_x`, `spacing` apart.
    pub fn build_tables(
        records: &[ImportRecord],
        ids: &dyn IdAllocator,
        start_x: f64,
        spacing: f64,
    ) -> Vec<Table> {
        let mut tables: Vec<Table> = Vec::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        let mut x_offset = start_x;

        for record in records {
            let index = *by_name.entry(record.table_name.as_str()).or_insert_with(|| {
                tables.push(
                    Table::new(ids.allocate(IdKind::Table), record.table_name.clone())
                        .with_position(Position::new(x_offset, 0.0)),
                );
                x_offset += spacing;
                tables.len() - 1
            });
            tables[index]
                .columns
                .push(Column::new(ids.allocate(IdKind::Column), record.column_name.clone()));
        }

        tables
    }
}

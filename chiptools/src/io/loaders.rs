use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::core::{ConstantMap, Table};
use crate::parsing::csv_parser::{self, CsvOptions};
use crate::parsing::json_parser;

/// Represents the file format of table data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSourceType {
    Json,
    Csv,
}

impl TableSourceType {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "json" => Ok(TableSourceType::Json),
            "csv" => Ok(TableSourceType::Csv),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }
}

/// Result of loading table data
#[derive(Debug)]
pub struct TableLoadResult {
    pub table: Table,
    pub source_type: TableSourceType,
    pub num_rows: usize,
}

impl TableLoadResult {
    pub fn new(table: Table, source_type: TableSourceType) -> Self {
        let num_rows = table.row_count();
        Self {
            table,
            source_type,
            num_rows,
        }
    }
}

/// Unified interface for loading tables from JSON or CSV
pub struct TableLoader;

impl TableLoader {
    /// Load a table from a file (auto-detects JSON or CSV)
    pub fn load_from_file(path: &Path, csv_options: &CsvOptions) -> Result<TableLoadResult> {
        match TableSourceType::from_path(path)? {
            TableSourceType::Json => Self::load_from_json(path),
            TableSourceType::Csv => Self::load_from_csv(path, csv_options),
        }
    }

    /// Load a table from a JSON file
    pub fn load_from_json(json_path: &Path) -> Result<TableLoadResult> {
        let table =
            json_parser::parse_table_json(json_path).context("Failed to parse JSON file")?;
        debug!("Loaded {} rows from {}", table.row_count(), json_path.display());

        Ok(TableLoadResult::new(table, TableSourceType::Json))
    }

    /// Load a table from a JSON string
    pub fn load_from_json_str(json_str: &str) -> Result<TableLoadResult> {
        let table = json_parser::parse_table_json_str(json_str)
            .context("Failed to parse JSON string")?;

        Ok(TableLoadResult::new(table, TableSourceType::Json))
    }

    /// Load a table from a CSV file
    pub fn load_from_csv(csv_path: &Path, csv_options: &CsvOptions) -> Result<TableLoadResult> {
        let table = csv_parser::parse_table_csv(csv_path, csv_options)
            .context("Failed to parse CSV file")?;
        debug!("Loaded {} rows from {}", table.row_count(), csv_path.display());

        Ok(TableLoadResult::new(table, TableSourceType::Csv))
    }
}

/// Writes tables and constant mappings to disk
pub struct TableWriter;

impl TableWriter {
    /// Write a table to a file, choosing the format from the extension
    pub fn write_to_file(table: &Table, path: &Path, csv_options: &CsvOptions) -> Result<()> {
        match TableSourceType::from_path(path)? {
            TableSourceType::Json => {
                let json = json_parser::table_to_json(table)?;
                fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            TableSourceType::Csv => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                csv_parser::table_to_csv(table, BufWriter::new(file), csv_options)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        debug!("Wrote {} rows to {}", table.row_count(), path.display());
        Ok(())
    }

    /// Write a constant mapping as JSON
    pub fn write_constants(constants: &ConstantMap, path: &Path) -> Result<()> {
        let json = json_parser::constants_to_json(constants)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

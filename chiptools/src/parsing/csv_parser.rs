use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::{Cell, Row, RowKey, Table, Value};

/// Tokens read as a missing cell unless configured otherwise.
pub const DEFAULT_MISSING_TOKENS: &[&str] = &["", "NaN", "nan", "NA", "null"];

/// Options for reading and writing delimited tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub missing_tokens: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_tokens: DEFAULT_MISSING_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CsvOptions {
    pub fn is_missing(&self, field: &str) -> bool {
        let field = field.trim();
        self.missing_tokens.iter().any(|token| token == field)
    }

    /// Read one field as a cell.
    pub fn parse_cell(&self, field: &str) -> Cell {
        if self.is_missing(field) {
            Cell::Missing
        } else {
            Cell::Present(Value::parse_literal(field))
        }
    }
}

/// Parse a CSV file into a [`Table`].
///
/// The first column holds the row-keys; its header becomes the table label.
pub fn parse_table_csv(csv_path: &Path, options: &CsvOptions) -> Result<Table> {
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    parse_table_reader(file, options)
        .with_context(|| format!("Failed to parse CSV file: {}", csv_path.display()))
}

/// Parse CSV text into a [`Table`].
pub fn parse_table_csv_str(csv: &str, options: &CsvOptions) -> Result<Table> {
    parse_table_reader(csv.as_bytes(), options)
}

fn parse_table_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();
    let mut header_fields = headers.iter();
    let index_name = header_fields
        .next()
        .context("CSV header has no row-key column")?
        .trim()
        .to_string();
    let columns: Vec<String> = header_fields.map(|name| name.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let record = record.with_context(|| format!("Failed to read CSV line {}", line))?;

        if record.len() != columns.len() + 1 {
            bail!(
                "CSV line {} has {} fields, expected {}",
                line,
                record.len(),
                columns.len() + 1
            );
        }

        let key_field = &record[0];
        if options.is_missing(key_field) {
            bail!("CSV line {} has no row-key", line);
        }

        let cells = record.iter().skip(1).map(|field| options.parse_cell(field)).collect();
        rows.push(Row::new(RowKey::parse(key_field), cells));
    }

    let mut table = Table::new(columns, rows);
    if !index_name.is_empty() {
        table.label = Some(index_name);
    }
    Ok(table)
}

/// Write a table as CSV. The label heads the row-key column; missing cells
/// are written as empty fields.
pub fn table_to_csv<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let index_header = table.label.as_deref().unwrap_or("");
    csv_writer
        .write_record(std::iter::once(index_header).chain(table.columns.iter().map(String::as_str)))
        .context("Failed to write CSV header")?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.cells.len() + 1);
        record.push(row.key.to_string());
        record.extend(row.cells.iter().map(|cell| match cell {
            Cell::Present(value) => value.to_string(),
            Cell::Missing => String::new(),
        }));
        csv_writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row for key {}", row.key))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write a table as a CSV string.
pub fn table_to_csv_string(table: &Table, options: &CsvOptions) -> Result<String> {
    let mut buffer = Vec::new();
    table_to_csv(table, &mut buffer, options)?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}

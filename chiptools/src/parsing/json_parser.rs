use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{Cell, ConstantMap, Row, RowKey, Table, Value};

/// Raw JSON structure of a row
#[derive(Debug, Deserialize)]
struct RawRow {
    key: serde_json::Value,
    #[serde(default)]
    cells: Vec<serde_json::Value>,
}

/// Raw JSON structure of a table
///
/// ```json
/// {"label": "time", "columns": ["A"], "rows": [{"key": "2019-04-02 11:00:00", "cells": [1.0]}]}
/// ```
#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    label: Option<String>,
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<RawRow>,
}

#[derive(Serialize)]
struct RowJson<'a> {
    key: &'a RowKey,
    cells: &'a [Cell],
}

#[derive(Serialize)]
struct TableJson<'a> {
    label: Option<&'a str>,
    columns: &'a [String],
    rows: Vec<RowJson<'a>>,
}

/// Parse a table JSON file
pub fn parse_table_json(json_path: &Path) -> Result<Table> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_table_json_str(&json_content)
        .with_context(|| format!("Failed to parse JSON file: {}", json_path.display()))
}

/// Parse a table from a JSON string
///
/// Cells keep their JSON types: `null` is missing, strings stay text.
/// Ragged rows are accepted here and left for validation to report.
pub fn parse_table_json_str(json_str: &str) -> Result<Table> {
    let deserializer = &mut serde_json::Deserializer::from_str(json_str);
    let raw: RawTable = serde_path_to_error::deserialize(deserializer).map_err(|e| {
        anyhow::anyhow!("Invalid table JSON at '{}': {}", e.path(), e.inner())
    })?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (idx, raw_row) in raw.rows.into_iter().enumerate() {
        let key = json_to_key(&raw_row.key)
            .with_context(|| format!("Invalid row-key in row {}", idx))?;
        let cells = raw_row
            .cells
            .iter()
            .enumerate()
            .map(|(col, value)| {
                json_to_cell(value)
                    .with_context(|| format!("Invalid cell in row {}, column {}", idx, col))
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(Row { key, cells });
    }

    Ok(Table {
        columns: raw.columns,
        rows,
        label: raw.label,
    })
}

fn json_to_key(value: &serde_json::Value) -> Result<RowKey> {
    match value {
        serde_json::Value::String(s) => Ok(RowKey::parse(s)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(RowKey::Int(i)),
            None => bail!("row-key must be an integer or a string, got {}", n),
        },
        other => bail!("row-key must be an integer or a string, got {}", other),
    }
}

fn json_to_cell(value: &serde_json::Value) -> Result<Cell> {
    let cell = match value {
        serde_json::Value::Null => Cell::Missing,
        serde_json::Value::Bool(b) => Cell::Present(Value::Bool(*b)),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Cell::Present(Value::Int(i)),
            (None, Some(f)) => Cell::Present(Value::Float(f)),
            (None, None) => bail!("unrepresentable number {}", n),
        },
        serde_json::Value::String(s) => Cell::Present(Value::Text(s.clone())),
        other => bail!("cells must be scalars, got {}", other),
    };
    Ok(cell)
}

/// Serialize a table to pretty-printed JSON in the layout read by
/// [`parse_table_json_str`].
pub fn table_to_json(table: &Table) -> Result<String> {
    let doc = TableJson {
        label: table.label.as_deref(),
        columns: &table.columns,
        rows: table
            .rows
            .iter()
            .map(|row| RowJson {
                key: &row.key,
                cells: &row.cells,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize table")
}

/// Serialize a constant mapping to pretty-printed JSON.
pub fn constants_to_json(constants: &ConstantMap) -> Result<String> {
    serde_json::to_string_pretty(constants).context("Failed to serialize constant mapping")
}

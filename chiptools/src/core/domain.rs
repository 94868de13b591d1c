//! Domain model for tables of keyed observations.
//!
//! A [`Table`] is an ordered list of [`Row`]s. Every row carries a [`RowKey`]
//! (in practice a timestamp) and one [`Cell`] per named column. A cell either
//! holds a [`Value`] or the explicit [`Cell::Missing`] marker, so missing data
//! never hides behind a sentinel float.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::{CleanupError, CleanupResult};

/// Reserved [`ConstantMap`] key holding a table's previous label.
pub const INDEX_NAME_KEY: &str = "index.name";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp in one of the accepted `YYYY-MM-DD[ HH:MM[:SS[.f]]]` layouts.
///
/// A bare date is read as midnight.
///
/// # Examples
///
/// ```
/// use chiptools::core::domain::parse_timestamp;
///
/// let ts = parse_timestamp("2019-04-02 11:00:00").unwrap();
/// assert_eq!(ts.to_string(), "2019-04-02 11:00:00");
/// assert!(parse_timestamp("not a time").is_none());
/// ```
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

/// Canonical bit pattern so that equality and hashing agree
/// (every NaN is one value, `-0.0` equals `0.0`).
fn canonical_float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// A present cell value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Parse a single literal: integer, float, bool, timestamp, else text.
    ///
    /// Each literal is read on its own; no type is fixed per column.
    ///
    /// # Examples
    ///
    /// ```
    /// use chiptools::core::domain::Value;
    ///
    /// assert_eq!(Value::parse_literal("3"), Value::Int(3));
    /// assert_eq!(Value::parse_literal("2.5"), Value::Float(2.5));
    /// assert_eq!(Value::parse_literal("true"), Value::Bool(true));
    /// assert_eq!(Value::parse_literal("north"), Value::Text("north".to_string()));
    /// ```
    pub fn parse_literal(s: &str) -> Value {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        match trimmed {
            "true" | "True" | "TRUE" => return Value::Bool(true),
            "false" | "False" | "FALSE" => return Value::Bool(false),
            _ => {}
        }
        if let Some(ts) = parse_timestamp(trimmed) {
            return Value::Timestamp(ts);
        }
        Value::Text(s.to_string())
    }

    /// Short name of the variant, used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                canonical_float_bits(*a) == canonical_float_bits(*b)
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => canonical_float_bits(*v).hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Text(v) => v.hash(state),
            Value::Timestamp(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // `{:?}` keeps the fraction (`1.0`), so the text reads back as a float
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Timestamp(v) => f.write_str(&format_timestamp(v)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Timestamp(v) => serializer.serialize_str(&format_timestamp(v)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

/// One table cell: a value or the missing marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Present(Value),
    Missing,
}

impl Cell {
    pub fn present(value: impl Into<Value>) -> Self {
        Cell::Present(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Present(v) => Some(v),
            Cell::Missing => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Present(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Cell::Present(v.into()),
            None => Cell::Missing,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Present(v) => v.serialize(serializer),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// Ordering and grouping key of a row.
///
/// Keys of the same kind are totally ordered. Keys of different kinds have no
/// ordering relative to each other, which is why [`RowKey`] only implements
/// [`PartialOrd`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Timestamp(NaiveDateTime),
    Int(i64),
    Text(String),
}

impl RowKey {
    /// Parse a key as a timestamp, then an integer, falling back to text.
    pub fn parse(s: &str) -> RowKey {
        let trimmed = s.trim();
        if let Some(ts) = parse_timestamp(trimmed) {
            return RowKey::Timestamp(ts);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return RowKey::Int(i);
        }
        RowKey::Text(trimmed.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RowKey::Timestamp(_) => "timestamp",
            RowKey::Int(_) => "int",
            RowKey::Text(_) => "text",
        }
    }

    /// Compare two keys, or `None` when they are of different kinds.
    pub fn try_cmp(&self, other: &RowKey) -> Option<Ordering> {
        match (self, other) {
            (RowKey::Timestamp(a), RowKey::Timestamp(b)) => Some(a.cmp(b)),
            (RowKey::Int(a), RowKey::Int(b)) => Some(a.cmp(b)),
            (RowKey::Text(a), RowKey::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialOrd for RowKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
            RowKey::Int(v) => write!(f, "{}", v),
            RowKey::Text(v) => f.write_str(v),
        }
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowKey::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            RowKey::Int(v) => serializer.serialize_i64(*v),
            RowKey::Text(v) => serializer.serialize_str(v),
        }
    }
}

impl From<NaiveDateTime> for RowKey {
    fn from(ts: NaiveDateTime) -> Self {
        RowKey::Timestamp(ts)
    }
}

impl From<i64> for RowKey {
    fn from(v: i64) -> Self {
        RowKey::Int(v)
    }
}

impl From<i32> for RowKey {
    fn from(v: i32) -> Self {
        RowKey::Int(i64::from(v))
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        RowKey::Text(v.to_string())
    }
}

/// A keyed row of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: RowKey,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(key: impl Into<RowKey>, cells: Vec<Cell>) -> Self {
        Self {
            key: key.into(),
            cells,
        }
    }

    /// Number of non-missing cells.
    pub fn completeness(&self) -> usize {
        self.cells.iter().filter(|c| c.is_present()).count()
    }
}

/// Stable sort of rows by key.
///
/// Keys of different kinds compare as equal here; callers reject mixed kinds
/// first.
pub(crate) fn sort_rows(rows: &mut [Row]) {
    rows.sort_by(|a, b| a.key.try_cmp(&b.key).unwrap_or(Ordering::Equal));
}

/// In-memory table of keyed rows with named columns and an optional label.
///
/// The label plays the role of an index name: CSV files carry it as the
/// header of the row-key column.
///
/// # Examples
///
/// ```
/// use chiptools::core::domain::{Cell, Row, Table};
///
/// let table = Table::new(
///     ["A", "B"],
///     vec![
///         Row::new(1, vec![Cell::present(1.0), Cell::Missing]),
///         Row::new(2, vec![Cell::present(3.0), Cell::present(4.0)]),
///     ],
/// );
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.col_count(), 2);
/// assert!(table.is_rectangular());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub label: Option<String>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, rows: Vec<Row>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of the column at `index`, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.cells.get(index))
    }

    /// Cells of the named column, if it exists.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        self.column_index(name)
            .map(|index| self.column_cells(index).collect())
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> + '_ {
        self.rows.iter().map(|row| &row.key)
    }

    /// True when every row has exactly one cell per column.
    pub fn is_rectangular(&self) -> bool {
        let width = self.columns.len();
        self.rows.iter().all(|row| row.cells.len() == width)
    }

    pub fn is_sorted_by_key(&self) -> bool {
        self.rows
            .windows(2)
            .all(|pair| matches!(pair[0].key.try_cmp(&pair[1].key), Some(Ordering::Less | Ordering::Equal)))
    }

    /// Stable sort of the rows by key.
    ///
    /// # Errors
    ///
    /// [`CleanupError::PreconditionViolation`] when the keys are of more than
    /// one kind; the rows are left as they were.
    pub fn sort_by_key(&mut self) -> CleanupResult<()> {
        {
            let mut keys = self.keys();
            if let Some(first) = keys.next() {
                if let Some(other) = keys.find(|key| key.kind() != first.kind()) {
                    return Err(CleanupError::PreconditionViolation(format!(
                        "cannot sort row-key {} ({}) against row-key {} ({})",
                        other,
                        other.kind(),
                        first,
                        first.kind()
                    )));
                }
            }
        }
        sort_rows(&mut self.rows);
        Ok(())
    }

    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.len() - row.completeness())
            .sum()
    }

    /// New table holding only the columns at `indices`, in the given order.
    ///
    /// Row-keys and the label are carried over.
    pub fn select_columns(&self, indices: &[usize]) -> Table {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                key: row.key.clone(),
                cells: indices.iter().map(|&i| row.cells[i].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            rows,
            label: self.label.clone(),
        }
    }
}

/// Column name to constant value, as produced by constant-column extraction.
///
/// The reserved key [`INDEX_NAME_KEY`] stores a table's previous label when
/// the extraction relabels the table; [`ConstantMap::prior_label`] reads it
/// back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConstantMap {
    entries: BTreeMap<String, Cell>,
}

impl ConstantMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert an entry, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Cell) -> Option<Cell> {
        self.entries.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Label the table carried before it was relabelled, if one was stashed.
    pub fn prior_label(&self) -> Option<&str> {
        self.entries
            .get(INDEX_NAME_KEY)
            .and_then(Cell::value)
            .and_then(Value::as_text)
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for ConstantMap {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

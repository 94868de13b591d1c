//! Table validation with error and warning reporting.
//!
//! This module checks a [`Table`] for the shape problems that make the cleanup
//! transformations refuse their input (ragged rows, row-keys that cannot be
//! ordered against each other) and reports the data-quality facts the
//! transformations act on (duplicated keys, constant columns, missing cells).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::{CleanupError, CleanupResult, RowKey, Table};
use crate::transformations::constants::constant_value;

/// How many per-row messages are reported before collapsing into a total.
const MAX_REPORTED: usize = 5;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false. Warnings are informational: a table with
/// duplicated keys is exactly what the reducer exists for.
///
/// # Examples
///
/// ```
/// use chiptools::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Row 3 has 2 cells, expected 4".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
///
/// * `duplicate_keys` - rows whose key already appeared on an earlier row
/// * `constant_columns` - columns holding a single distinct value, missing
///   counted as a value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_rows: usize,
    pub total_columns: usize,
    pub ragged_rows: usize,
    pub duplicate_keys: usize,
    pub missing_cells: usize,
    pub constant_columns: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds an error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for keyed tables.
pub struct TableValidator;

impl TableValidator {
    /// Validates a table.
    ///
    /// Errors:
    /// - duplicate column names
    /// - rows whose cell count differs from the column count
    /// - row-keys of more than one kind
    ///
    /// Warnings:
    /// - duplicated row-keys
    /// - constant columns
    ///
    /// # Examples
    ///
    /// ```
    /// use chiptools::core::{Cell, Row, Table};
    /// use chiptools::preprocessing::validator::TableValidator;
    ///
    /// let table = Table::new(
    ///     ["A"],
    ///     vec![
    ///         Row::new(1, vec![Cell::present(1.0)]),
    ///         Row::new(1, vec![Cell::Missing]),
    ///     ],
    /// );
    /// let result = TableValidator::validate(&table);
    /// assert!(result.is_valid);
    /// assert_eq!(result.stats.duplicate_keys, 1);
    /// assert_eq!(result.stats.missing_cells, 1);
    /// ```
    pub fn validate(table: &Table) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.stats.total_rows = table.row_count();
        result.stats.total_columns = table.col_count();

        Self::check_column_names(table, &mut result);
        result.stats.ragged_rows = Self::check_ragged_rows(table, &mut result);
        Self::check_key_kinds(table, &mut result);
        result.stats.duplicate_keys = Self::check_duplicate_keys(table, &mut result);
        result.stats.missing_cells = table.missing_count();

        // Column scans are only meaningful on a rectangular table
        if result.stats.ragged_rows == 0 {
            result.stats.constant_columns = Self::check_constant_columns(table, &mut result);
        }

        result
    }

    /// Fails with [`CleanupError::PreconditionViolation`] unless the table is
    /// rectangular and all row-keys are mutually orderable.
    pub fn check_preconditions(table: &Table) -> CleanupResult<()> {
        Self::check_shape(table)?;

        let mut keys = table.keys();
        if let Some(first) = keys.next() {
            if let Some(other) = keys.find(|key| key.try_cmp(first).is_none()) {
                return Err(CleanupError::PreconditionViolation(format!(
                    "row-key {} ({}) cannot be ordered against row-key {} ({})",
                    other,
                    other.kind(),
                    first,
                    first.kind()
                )));
            }
        }
        Ok(())
    }

    /// Fails with [`CleanupError::PreconditionViolation`] on the first row
    /// whose cell count differs from the column count.
    pub fn check_shape(table: &Table) -> CleanupResult<()> {
        let width = table.col_count();
        match table
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.cells.len() != width)
        {
            Some((idx, row)) => Err(CleanupError::PreconditionViolation(format!(
                "row {} (key {}) has {} cells, expected {}",
                idx,
                row.key,
                row.cells.len(),
                width
            ))),
            None => Ok(()),
        }
    }

    fn check_column_names(table: &Table, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for name in &table.columns {
            if !seen.insert(name.as_str()) {
                result.add_error(format!("Duplicate column name: {}", name));
            }
        }
    }

    fn check_ragged_rows(table: &Table, result: &mut ValidationResult) -> usize {
        let width = table.col_count();
        let mut ragged = 0;

        for (idx, row) in table.rows.iter().enumerate() {
            if row.cells.len() != width {
                ragged += 1;
                if ragged <= MAX_REPORTED {
                    result.add_error(format!(
                        "Row {} (key {}) has {} cells, expected {}",
                        idx,
                        row.key,
                        row.cells.len(),
                        width
                    ));
                }
            }
        }

        if ragged > MAX_REPORTED {
            result.add_error(format!(
                "Total ragged rows: {} (showing first {})",
                ragged, MAX_REPORTED
            ));
        }

        ragged
    }

    fn check_key_kinds(table: &Table, result: &mut ValidationResult) {
        let mut kinds: Vec<&'static str> = table.keys().map(RowKey::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();

        if kinds.len() > 1 {
            result.add_error(format!(
                "Row-keys are not mutually orderable, found kinds: {}",
                kinds.join(", ")
            ));
        }
    }

    fn check_duplicate_keys(table: &Table, result: &mut ValidationResult) -> usize {
        let mut seen = HashSet::new();
        let mut duplicated = HashSet::new();
        let mut duplicates = 0;

        for key in table.keys() {
            if !seen.insert(key) {
                duplicates += 1;
                duplicated.insert(key);
            }
        }

        if duplicates > 0 {
            result.add_warning(format!(
                "Found {} rows sharing {} duplicated row-keys",
                duplicates,
                duplicated.len()
            ));
        }

        duplicates
    }

    fn check_constant_columns(table: &Table, result: &mut ValidationResult) -> usize {
        let constant: Vec<&str> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| constant_value(table.column_cells(*idx), true).is_some())
            .map(|(_, name)| name.as_str())
            .collect();

        if !constant.is_empty() {
            result.add_warning(format!("Constant columns: {}", constant.join(", ")));
        }

        constant.len()
    }
}

use log::{debug, warn};
use std::collections::HashSet;

use crate::core::{Cell, CleanupError, CleanupResult, ConstantMap, Table, Value, INDEX_NAME_KEY};
use crate::preprocessing::validator::TableValidator;

/// Options for constant-column extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Label to give the output table. The previous label, if any, is stored
    /// in the mapping under [`INDEX_NAME_KEY`].
    pub new_label: Option<String>,
    /// Count the missing marker as a distinct value.
    pub count_missing_as_value: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            new_label: None,
            count_missing_as_value: true,
        }
    }
}

impl ExtractOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.new_label = Some(label.into());
        self
    }

    pub fn ignoring_missing(mut self) -> Self {
        self.count_missing_as_value = false;
        self
    }
}

/// The single value of a column, if it has exactly one distinct value.
///
/// With `count_missing_as_value` the missing marker is a value of its own;
/// otherwise missing cells are skipped and an all-missing column has no value.
pub fn constant_value<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    count_missing_as_value: bool,
) -> Option<Cell> {
    let mut first: Option<&Cell> = None;
    for cell in cells {
        if !count_missing_as_value && cell.is_missing() {
            continue;
        }
        match first {
            None => first = Some(cell),
            Some(seen) if seen != cell => return None,
            Some(_) => {}
        }
    }
    first.cloned()
}

/// Number of distinct values among `cells`.
pub fn distinct_count<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    count_missing_as_value: bool,
) -> usize {
    cells
        .into_iter()
        .filter(|cell| count_missing_as_value || cell.is_present())
        .collect::<HashSet<_>>()
        .len()
}

/// Moves constant-valued columns out of a table into a [`ConstantMap`].
///
/// # Examples
///
/// ```
/// use chiptools::core::{Cell, ConstantMap, Row, Table};
/// use chiptools::transformations::ConstantColumnExtractor;
///
/// let table = Table::new(
///     ["site", "temp"],
///     vec![
///         Row::new(1, vec![Cell::present("north"), Cell::present(11.5)]),
///         Row::new(2, vec![Cell::present("north"), Cell::present(12.0)]),
///     ],
/// );
/// let mut constants = ConstantMap::new();
/// let slim = ConstantColumnExtractor::new().extract(&table, &mut constants).unwrap();
/// assert_eq!(slim.columns, vec!["temp"]);
/// assert_eq!(constants.get("site"), Some(&Cell::present("north")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstantColumnExtractor {
    options: ExtractOptions,
}

impl ConstantColumnExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Remove every constant column from `table`, recording it in `mapping`.
    ///
    /// All columns are scanned before any is removed. Retained columns keep
    /// their order, row-keys are untouched. Entries already in `mapping` are
    /// kept, except that a constant column replaces an entry of the same name.
    ///
    /// # Errors
    ///
    /// - [`CleanupError::PreconditionViolation`] for ragged rows.
    /// - [`CleanupError::MappingCollision`] when a new label is requested and
    ///   `mapping` already holds [`INDEX_NAME_KEY`], or the prior label would
    ///   land on a constant column of that name. Neither `table` nor
    ///   `mapping` is modified in that case.
    pub fn extract(&self, table: &Table, mapping: &mut ConstantMap) -> CleanupResult<Table> {
        TableValidator::check_shape(table)?;

        let mut retained = Vec::with_capacity(table.col_count());
        let mut constants = Vec::new();
        for (idx, name) in table.columns.iter().enumerate() {
            match constant_value(table.column_cells(idx), self.options.count_missing_as_value) {
                Some(value) => constants.push((name.as_str(), value)),
                None => retained.push(idx),
            }
        }

        if self.options.new_label.is_some() {
            let stashes_label = table.label.is_some();
            if mapping.contains_key(INDEX_NAME_KEY)
                || (stashes_label && constants.iter().any(|(name, _)| *name == INDEX_NAME_KEY))
            {
                return Err(CleanupError::MappingCollision(format!(
                    "'{}' is already set; the mapping appears to be reused across tables",
                    INDEX_NAME_KEY
                )));
            }
        }

        debug!(
            "Extracting {} constant columns out of {}",
            constants.len(),
            table.col_count()
        );

        for (name, value) in constants {
            if let Some(previous) = mapping.insert(name, value.clone()) {
                if previous != value {
                    warn!(
                        "Constant for column '{}' replaced: {:?} -> {:?}",
                        name, previous, value
                    );
                }
            }
        }

        let mut slim = table.select_columns(&retained);

        if let Some(new_label) = &self.options.new_label {
            if let Some(prior) = &table.label {
                mapping.insert(INDEX_NAME_KEY, Cell::Present(Value::Text(prior.clone())));
            }
            slim.label = Some(new_label.clone());
        }

        Ok(slim)
    }
}

/// Split `table` into its non-constant columns and a fresh mapping of the
/// constant ones.
pub fn extract_constant_columns(
    table: &Table,
    options: &ExtractOptions,
) -> CleanupResult<(Table, ConstantMap)> {
    let mut mapping = ConstantMap::new();
    let slim = ConstantColumnExtractor::with_options(options.clone()).extract(table, &mut mapping)?;
    Ok((slim, mapping))
}

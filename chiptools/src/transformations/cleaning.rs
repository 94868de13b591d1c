use log::debug;
use std::str::FromStr;

use crate::core::domain::sort_rows;
use crate::core::{CleanupError, CleanupResult, Row, Table};
use crate::preprocessing::validator::TableValidator;

/// Which row survives when several rows share a row-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeep {
    /// First row of the group after a stable sort.
    First,
    /// Last row of the group after a stable sort.
    Last,
    /// Drop every row whose key is duplicated.
    None,
    /// Row with the most non-missing cells; the first such row on a tie.
    #[default]
    MostComplete,
}

impl FromStr for DuplicateKeep {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(DuplicateKeep::First),
            "last" => Ok(DuplicateKeep::Last),
            "none" => Ok(DuplicateKeep::None),
            "most_complete" | "most-complete" => Ok(DuplicateKeep::MostComplete),
            other => Err(CleanupError::ParseError(format!(
                "Invalid keep strategy: {}. Must be 'first', 'last', 'none', or 'most_complete'",
                other
            ))),
        }
    }
}

/// Collapses rows that share a row-key, one row per key.
///
/// # Examples
///
/// ```
/// use chiptools::core::{Cell, Row, Table};
/// use chiptools::transformations::DuplicateRowReducer;
///
/// let table = Table::new(
///     ["A", "B"],
///     vec![
///         Row::new(1, vec![Cell::present(1.0), Cell::Missing]),
///         Row::new(1, vec![Cell::present(3.0), Cell::present(4.0)]),
///     ],
/// );
/// let reduced = DuplicateRowReducer::new().reduce(&table).unwrap();
/// assert_eq!(reduced.row_count(), 1);
/// assert_eq!(reduced.rows[0].cells[0], Cell::present(3.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateRowReducer {
    keep: DuplicateKeep,
}

impl DuplicateRowReducer {
    /// Reducer keeping the most complete row per key.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep(keep: DuplicateKeep) -> Self {
        Self { keep }
    }

    pub fn keep(&self) -> DuplicateKeep {
        self.keep
    }

    /// Produce a table with unique row-keys, sorted by key.
    ///
    /// Rows whose key is unique pass through unchanged. The input is left
    /// untouched; on error nothing is produced.
    ///
    /// # Errors
    ///
    /// [`CleanupError::PreconditionViolation`] when the table has ragged rows
    /// or row-keys of different kinds.
    pub fn reduce(&self, table: &Table) -> CleanupResult<Table> {
        TableValidator::check_preconditions(table)?;

        let mut rows = table.rows.clone();
        sort_rows(&mut rows);

        // Mark every row that belongs to a duplicate group and the one
        // representative chosen from each group.
        let mut in_group = vec![false; rows.len()];
        let mut chosen = vec![false; rows.len()];
        let mut groups = 0usize;
        let mut start = 0usize;

        for group in rows.chunk_by(|a, b| a.key == b.key) {
            let end = start + group.len();
            if group.len() > 1 {
                groups += 1;
                in_group[start..end].fill(true);
                if let Some(offset) = select_representative(group, self.keep) {
                    chosen[start + offset] = true;
                }
            }
            start = end;
        }

        let duplicate_rows = in_group.iter().filter(|&&flag| flag).count();
        debug!(
            "Reducing {} rows: {} duplicate key groups covering {} rows (keep={:?})",
            rows.len(),
            groups,
            duplicate_rows,
            self.keep
        );

        let mut reduced = Vec::with_capacity(rows.len() - duplicate_rows + groups);
        let mut representatives = Vec::with_capacity(groups);
        for (idx, row) in rows.into_iter().enumerate() {
            if !in_group[idx] {
                reduced.push(row);
            } else if chosen[idx] {
                representatives.push(row);
            }
        }

        reduced.extend(representatives);
        sort_rows(&mut reduced);

        Ok(Table {
            columns: table.columns.clone(),
            rows: reduced,
            label: table.label.clone(),
        })
    }
}

/// Position within `group` of the row to keep, if any.
fn select_representative(group: &[Row], keep: DuplicateKeep) -> Option<usize> {
    match keep {
        DuplicateKeep::First => Some(0),
        DuplicateKeep::Last => group.len().checked_sub(1),
        DuplicateKeep::None => None,
        DuplicateKeep::MostComplete => most_complete(group),
    }
}

/// Index of the row with the highest completeness score; earliest wins ties.
fn most_complete(group: &[Row]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, row) in group.iter().enumerate() {
        let score = row.completeness();
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Remove rows with duplicate row-keys according to `keep`.
pub fn drop_duplicate_keys(table: &Table, keep: DuplicateKeep) -> CleanupResult<Table> {
    DuplicateRowReducer::with_keep(keep).reduce(table)
}

/// Remove rows with duplicate row-keys, keeping per key the row with the
/// fewest missing cells.
///
/// The result is sorted by row-key.
pub fn reduce_duplicate_rows(table: &Table) -> CleanupResult<Table> {
    drop_duplicate_keys(table, DuplicateKeep::MostComplete)
}

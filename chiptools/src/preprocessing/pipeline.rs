use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::config::CleanupConfig;
use crate::core::{ConstantMap, Table};
use crate::io::loaders::TableLoader;
use crate::preprocessing::validator::{TableValidator, ValidationResult};
use crate::transformations::{drop_duplicate_keys, ConstantColumnExtractor};

/// Result of a cleanup run
#[derive(Debug)]
pub struct CleanupOutcome {
    pub table: Table,
    pub constants: ConstantMap,
    pub validation: ValidationResult,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_removed: usize,
}

/// Validate, reduce duplicates, then extract constant columns
pub struct CleanupPipeline {
    config: CleanupConfig,
}

impl CleanupPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: CleanupConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: CleanupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Clean a table into a fresh constant mapping
    pub fn run(&self, table: &Table) -> Result<CleanupOutcome> {
        self.run_with_mapping(table, ConstantMap::new())
    }

    /// Clean a table, adding extracted constants to `constants`.
    ///
    /// Fails before touching anything if validation reports errors.
    pub fn run_with_mapping(&self, table: &Table, constants: ConstantMap) -> Result<CleanupOutcome> {
        let mut constants = constants;

        // Step 1: Validate
        let validation = TableValidator::validate(table);
        if !validation.is_valid {
            anyhow::bail!("Table failed validation: {}", validation.errors.join("; "));
        }
        for warning in &validation.warnings {
            debug!("{}", warning);
        }

        // Step 2: Reduce duplicate row-keys
        let reduced = if self.config.cleanup.reduce_duplicates {
            let keep = self.config.keep_strategy()?;
            drop_duplicate_keys(table, keep).context("Failed to reduce duplicate rows")?
        } else {
            table.clone()
        };

        // Step 3: Extract constant columns
        let cleaned = if self.config.cleanup.extract_constants {
            ConstantColumnExtractor::with_options(self.config.extract_options())
                .extract(&reduced, &mut constants)
                .context("Failed to extract constant columns")?
        } else {
            reduced
        };

        let outcome = CleanupOutcome {
            rows_before: table.row_count(),
            rows_after: cleaned.row_count(),
            columns_removed: table.col_count() - cleaned.col_count(),
            table: cleaned,
            constants,
            validation,
        };

        info!(
            "Cleaned table: {} -> {} rows, {} constant columns extracted",
            outcome.rows_before, outcome.rows_after, outcome.columns_removed
        );

        Ok(outcome)
    }

    /// Load a table file (JSON or CSV) and clean it
    pub fn process(&self, path: &Path) -> Result<CleanupOutcome> {
        let csv_options = self.config.csv_options()?;
        let loaded = TableLoader::load_from_file(path, &csv_options)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        self.run(&loaded.table)
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to clean a table file with the given configuration
pub fn clean_file(path: &Path, config: CleanupConfig) -> Result<CleanupOutcome> {
    CleanupPipeline::with_config(config).process(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, Row, INDEX_NAME_KEY};
    use std::io::Write;
    use tempfile::Builder;

    fn observations() -> Table {
        Table::new(
            ["site", "temp", "wind"],
            vec![
                Row::new(1, vec![Cell::present("north"), Cell::present(11.0), Cell::Missing]),
                Row::new(1, vec![Cell::present("north"), Cell::present(11.5), Cell::present(3.0)]),
                Row::new(2, vec![Cell::present("north"), Cell::present(12.0), Cell::present(4.0)]),
            ],
        )
        .with_label("time")
    }

    #[test]
    fn test_run_default() {
        let outcome = CleanupPipeline::new().run(&observations()).unwrap();

        assert!(outcome.validation.is_valid);
        assert_eq!(outcome.rows_before, 3);
        assert_eq!(outcome.rows_after, 2);
        assert_eq!(outcome.columns_removed, 1);
        assert_eq!(outcome.table.columns, vec!["temp", "wind"]);
        assert_eq!(outcome.table.rows[0].cells, vec![Cell::present(11.5), Cell::present(3.0)]);
        assert_eq!(outcome.constants.get("site"), Some(&Cell::present("north")));
        assert_eq!(outcome.table.label.as_deref(), Some("time"));
    }

    #[test]
    fn test_run_with_steps_disabled() {
        let mut config = CleanupConfig::default();
        config.cleanup.reduce_duplicates = false;
        config.cleanup.extract_constants = false;

        let table = observations();
        let outcome = CleanupPipeline::with_config(config).run(&table).unwrap();
        assert_eq!(outcome.table, table);
        assert!(outcome.constants.is_empty());
    }

    #[test]
    fn test_run_with_label() {
        let mut config = CleanupConfig::default();
        config.cleanup.new_label = Some("meta".to_string());

        let outcome = CleanupPipeline::with_config(config).run(&observations()).unwrap();
        assert_eq!(outcome.table.label.as_deref(), Some("meta"));
        assert_eq!(outcome.constants.prior_label(), Some("time"));
    }

    #[test]
    fn test_run_with_reused_mapping_fails() {
        let mut config = CleanupConfig::default();
        config.cleanup.new_label = Some("meta".to_string());
        let mut mapping = ConstantMap::new();
        mapping.insert(INDEX_NAME_KEY, Cell::present("older"));

        let err = CleanupPipeline::with_config(config)
            .run_with_mapping(&observations(), mapping)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Mapping collision"));
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let mut table = observations();
        table.rows[2].cells.pop();

        let err = CleanupPipeline::new().run(&table).unwrap_err();
        assert!(err.to_string().contains("failed validation"));
    }

    #[test]
    fn test_bad_keep_strategy() {
        let mut config = CleanupConfig::default();
        config.cleanup.keep = "largest".to_string();

        assert!(CleanupPipeline::with_config(config).run(&observations()).is_err());
    }

    #[test]
    fn test_clean_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            temp_file,
            "time,A,B\n2019-04-02 11:00:00,1.0,7\n2019-04-02 11:00:00,,7\n2019-04-02 12:00:00,2.0,7\n"
        )
        .unwrap();

        let outcome = clean_file(temp_file.path(), CleanupConfig::default()).unwrap();
        assert_eq!(outcome.rows_after, 2);
        assert_eq!(outcome.table.columns, vec!["A"]);
        assert_eq!(outcome.constants.get("B"), Some(&Cell::present(7)));
    }
}

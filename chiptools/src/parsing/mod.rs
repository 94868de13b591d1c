//! Readers and writers for table file formats.
//!
//! # Parsers
//!
//! - [`csv_parser`]: delimited text with the row-key in the first column
//! - [`json_parser`]: `{"label", "columns", "rows": [{"key", "cells"}]}` documents
//!
//! # Example
//!
//! ```no_run
//! use chiptools::parsing::csv_parser::{parse_table_csv, CsvOptions};
//! use std::path::Path;
//!
//! let table = parse_table_csv(Path::new("observations.csv"), &CsvOptions::default())
//!     .expect("Failed to parse table");
//! ```

pub mod csv_parser;
pub mod json_parser;

#[cfg(test)]
mod csv_parser_tests;
#[cfg(test)]
mod json_parser_tests;

pub use csv_parser::CsvOptions;

//! High-level table loading and writing.
//!
//! Loaders pick a parser from the file extension and attach error context,
//! writers do the same for output.
//!
//! # Example
//!
//! ```no_run
//! use chiptools::io::loaders::TableLoader;
//! use chiptools::parsing::CsvOptions;
//! use std::path::Path;
//!
//! let result = TableLoader::load_from_file(Path::new("observations.csv"), &CsvOptions::default())
//!     .expect("Failed to load");
//! println!("Loaded {} rows", result.num_rows);
//! ```

pub mod loaders;


pub use loaders::{TableLoadResult, TableLoader, TableSourceType, TableWriter};

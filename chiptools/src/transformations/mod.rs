//! Table cleanup transformations.
//!
//! # Modules
//!
//! - [`cleaning`]: collapse rows that share a row-key
//! - [`constants`]: move constant-valued columns into a side mapping
//!
//! # Example
//!
//! ```
//! use chiptools::core::{Cell, Row, Table};
//! use chiptools::transformations::{extract_constant_columns, reduce_duplicate_rows, ExtractOptions};
//!
//! # fn example() -> chiptools::core::CleanupResult<()> {
//! let table = Table::new(
//!     ["station", "reading"],
//!     vec![
//!         Row::new(1, vec![Cell::present("A7"), Cell::Missing]),
//!         Row::new(1, vec![Cell::present("A7"), Cell::present(0.4)]),
//!         Row::new(2, vec![Cell::present("A7"), Cell::present(0.6)]),
//!     ],
//! );
//!
//! let reduced = reduce_duplicate_rows(&table)?;
//! assert_eq!(reduced.row_count(), 2);
//!
//! let (slim, constants) = extract_constant_columns(&reduced, &ExtractOptions::default())?;
//! assert_eq!(slim.columns, vec!["reading"]);
//! assert_eq!(constants.get("station"), Some(&Cell::present("A7")));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod cleaning;
pub mod constants;


pub use cleaning::{drop_duplicate_keys, reduce_duplicate_rows, DuplicateKeep, DuplicateRowReducer};
pub use constants::{
    constant_value, distinct_count, extract_constant_columns, ConstantColumnExtractor,
    ExtractOptions,
};

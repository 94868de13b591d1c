//! chiptools: cleanup for tables of timestamped observations.
//!
//! Two transformations do the work:
//!
//! - [`DuplicateRowReducer`] collapses rows that share a row-key, keeping the
//!   row with the fewest missing cells.
//! - [`ConstantColumnExtractor`] moves columns holding a single value into a
//!   [`ConstantMap`], optionally relabelling the table.
//!
//! Around them sit CSV/JSON parsing ([`parsing`]), file loading ([`io`]),
//! validation and a configurable pipeline ([`preprocessing`]), and TOML
//! settings ([`config`]).

pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod transformations;

pub use crate::config::CleanupConfig;
pub use crate::core::{Cell, CleanupError, CleanupResult, ConstantMap, Row, RowKey, Table, Value};
pub use crate::preprocessing::{CleanupOutcome, CleanupPipeline};
pub use crate::transformations::{ConstantColumnExtractor, DuplicateRowReducer};

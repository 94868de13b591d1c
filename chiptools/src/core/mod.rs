//! Core table model and error types.
//!
//! Everything else in the crate is written against the types defined here:
//! [`Table`], [`Row`], [`RowKey`], [`Cell`], [`Value`] and [`ConstantMap`].

pub mod domain;
pub mod error;

pub use domain::{
    parse_timestamp, Cell, ConstantMap, Row, RowKey, Table, Value, INDEX_NAME_KEY,
};
pub use error::{CleanupError, CleanupResult};

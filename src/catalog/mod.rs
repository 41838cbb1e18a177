//! Catalog module
//!
//! This module contains the schema catalog, table definitions, and data types.

pub mod catalog;
pub mod schema;
pub mod types;

pub use catalog::Catalog;
pub use schema::{Column, TableDef};
pub use types::DataType;

//! Storage module
//!
//! Per-table row files and the row line format.

pub mod row;
pub mod table;

pub use row::Row;
pub use table::Table;

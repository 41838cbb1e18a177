//! Error types for flatsql
//!
//! Every diagnostic a command can print is one variant here. The session
//! renders an `Err` as a single line and moves on to the next command.

use thiserror::Error;

/// The main error type for flatsql
#[derive(Error, Debug)]
pub enum Error {
    // ========== Syntax Errors ==========
    #[error("; missing at the end of the command")]
    MissingTerminator,

    #[error("invalid query")]
    InvalidQuery,

    #[error("invalid {command}: {detail}")]
    Syntax { command: String, detail: String },

    // ========== Referential Errors ==========
    #[error("table <{0}> doesn't exist")]
    TableNotFound(String),

    #[error("table <{0}> already exists")]
    TableAlreadyExists(String),

    #[error("unknown column {0} in table <{1}>")]
    ColumnNotFound(String, String),

    // ========== Schema Errors ==========
    #[error("defining a primary key is mandatory")]
    MissingPrimaryKey,

    #[error("primary key {0} is not a column of <{1}>")]
    PrimaryKeyNotDeclared(String, String),

    #[error("unknown type {ty} for column {column}")]
    UnknownType { column: String, ty: String },

    // ========== Arity / Type Errors ==========
    #[error("values count mismatch: expected {expected}, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("value {value} doesn't match type {ty} of column {column}")]
    TypeMismatch {
        column: String,
        ty: String,
        value: String,
    },

    #[error("operator {0} needs numeric operands")]
    NonNumericComparison(String),

    // ========== Uniqueness Errors ==========
    #[error("PK already exists: {0}")]
    DuplicateKey(String),

    #[error("refusing to update primary key without a where clause")]
    PrimaryKeyUpdateWithoutWhere,

    // ========== Catalog Errors ==========
    #[error("corrupt catalog block for <{table}>: {detail}")]
    CatalogCorruption { table: String, detail: String },

    // ========== Configuration Errors ==========
    #[error("config error: {0}")]
    Config(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a malformed command
    pub fn syntax(command: &str, detail: impl Into<String>) -> Self {
        Error::Syntax {
            command: command.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn corrupt(table: &str, detail: impl Into<String>) -> Self {
        Error::CatalogCorruption {
            table: table.to_string(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for flatsql operations
pub type Result<T> = std::result::Result<T, Error>;

//! Configuration for flatsql
//!
//! Where the catalog and row files live and how select output is laid out.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default catalog file name
pub const DEFAULT_SCHEMA_FILE: &str = "schema.txt";

/// Default row file extension
pub const DEFAULT_ROW_EXTENSION: &str = "tbl";

/// Default select column width
pub const DEFAULT_COLUMN_WIDTH: usize = 20;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the catalog and every row file
    pub data_dir: PathBuf,
    /// Catalog file name inside `data_dir`
    pub schema_file: String,
    /// Extension of the per-table row files
    pub row_extension: String,
    /// Width every selected field is padded to
    pub column_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            schema_file: DEFAULT_SCHEMA_FILE.to_string(),
            row_extension: DEFAULT_ROW_EXTENSION.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file; absent fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the catalog file name
    pub fn schema_file(mut self, name: impl Into<String>) -> Self {
        self.schema_file = name.into();
        self
    }

    /// Set the row file extension
    pub fn row_extension(mut self, ext: impl Into<String>) -> Self {
        self.row_extension = ext.into();
        self
    }

    /// Set the select column width
    pub fn column_width(mut self, width: usize) -> Self {
        self.column_width = width;
        self
    }

    /// Full path of the catalog file
    pub fn schema_path(&self) -> PathBuf {
        self.data_dir.join(&self.schema_file)
    }

    /// Full path of a table's row file
    pub fn row_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", table, self.row_extension))
    }
}

//! Schema definitions for flatsql
//!
//! This module defines table definitions and column metadata, and how they
//! are written to and read from a catalog block.

use super::types::DataType;
use crate::error::{Error, Result};

/// Start-of-columns marker inside a catalog block
pub const BLOCK_OPEN: &str = "<<";
/// End-of-block marker
pub const BLOCK_CLOSE: &str = ">>";
/// Prefix of the primary key line
pub const PK_PREFIX: &str = "pk:";

/// Name marker line for a table (`*Name*`)
pub fn name_marker(table: &str) -> String {
    format!("*{}*", table)
}

/// Extract the table name from a `*Name*` marker line
pub fn parse_name_marker(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.len() >= 2 && line.starts_with('*') && line.ends_with('*') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

/// Column definition in a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// `check` clause text, stored but never evaluated
    pub check: Option<String>,
}

impl Column {
    /// Create a new column without a check clause
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            check: None,
        }
    }

    /// Attach a check clause
    pub fn check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// Render as a catalog column line: `name type [args] [check ...]`
    pub fn to_catalog_line(&self) -> String {
        let mut line = format!("{} {}", self.name, self.data_type.catalog_form());
        if let Some(check) = &self.check {
            line.push_str(" check");
            if !check.is_empty() {
                line.push(' ');
                line.push_str(check);
            }
        }
        line
    }

    /// Parse a catalog column line
    pub fn from_catalog_line(table: &str, line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, rest) = words
            .split_first()
            .ok_or_else(|| Error::corrupt(table, "empty column line"))?;
        let (data_type, used) = DataType::from_catalog_words(rest)
            .ok_or_else(|| Error::corrupt(table, format!("bad column line '{}'", line.trim())))?;

        let mut column = Column::new(*name, data_type);
        match rest.get(used) {
            None => {}
            Some(&"check") => column = column.check(rest[used + 1..].join(" ")),
            Some(extra) => {
                return Err(Error::corrupt(
                    table,
                    format!("unexpected '{}' in column {}", extra, name),
                ))
            }
        }
        Ok(column)
    }
}

/// Table definition - full table metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Primary key column name
    pub primary_key: String,
    /// Ordered columns; row fields follow this order
    pub columns: Vec<Column>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            columns,
        }
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of the primary key column
    pub fn primary_key_index(&self) -> Option<usize> {
        self.column_index(&self.primary_key)
    }

    /// Render the full catalog block, trailing blank line included
    pub fn to_block(&self) -> String {
        let mut block = format!(
            "{}\n{}\n{} {}\n",
            name_marker(&self.name),
            BLOCK_OPEN,
            PK_PREFIX,
            self.primary_key
        );
        for column in &self.columns {
            block.push_str(&column.to_catalog_line());
            block.push('\n');
        }
        block.push_str(BLOCK_CLOSE);
        block.push_str("\n\n");
        block
    }

    /// Parse a block as stored in the catalog, marker line through `>>`
    pub fn from_block(table: &str, lines: &[String]) -> Result<Self> {
        let mut opened = false;
        let mut closed = false;
        let mut primary_key = None;
        let mut columns = Vec::new();

        for line in lines.iter().skip(1) {
            let line = line.trim();
            if !opened {
                if line == BLOCK_OPEN {
                    opened = true;
                }
                continue;
            }
            if line == BLOCK_CLOSE {
                closed = true;
                break;
            }
            if line.is_empty() {
                continue;
            }
            if let Some(pk) = line.strip_prefix(PK_PREFIX) {
                primary_key = Some(pk.trim().to_string());
                continue;
            }
            columns.push(Column::from_catalog_line(table, line)?);
        }

        if !opened || !closed {
            return Err(Error::corrupt(table, "block is not delimited by << and >>"));
        }
        let primary_key = primary_key
            .filter(|pk| !pk.is_empty())
            .ok_or_else(|| Error::corrupt(table, "missing pk: line"))?;
        if columns.is_empty() {
            return Err(Error::corrupt(table, "no columns"));
        }

        let def = TableDef::new(table, columns, primary_key);
        if def.primary_key_index().is_none() {
            return Err(Error::corrupt(
                table,
                format!("primary key {} is not a column", def.primary_key),
            ));
        }
        Ok(def)
    }
}

//! Schema Catalog for flatsql
//!
//! All table definitions live in one text file as sequential blocks. The file
//! is read once and kept as raw blocks in memory; appending or removing a block
//! rewrites the file and drops the in-memory copy so the next lookup rereads it.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use super::schema::{name_marker, parse_name_marker, TableDef, BLOCK_CLOSE};
use crate::error::{Error, Result};

/// System Catalog - manages all table definitions
#[derive(Debug)]
pub struct Catalog {
    /// Catalog file
    path: PathBuf,
    /// Raw block lines by table name, in file order; `None` until first use
    blocks: Option<IndexMap<String, Vec<String>>>,
}

impl Catalog {
    /// Open the catalog stored at `path`; the file need not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            blocks: None,
        }
    }

    /// Check if a table exists
    pub fn exists(&mut self, name: &str) -> Result<bool> {
        Ok(self.blocks()?.contains_key(name))
    }

    /// Read and validate a table definition
    pub fn read_definition(&mut self, name: &str) -> Result<TableDef> {
        let lines = self.raw_block(name)?;
        TableDef::from_block(name, &lines)
    }

    /// The block exactly as stored, marker line through `>>`
    pub fn raw_block(&mut self, name: &str) -> Result<Vec<String>> {
        self.blocks()?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// List all table names in file order
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(self.blocks()?.keys().cloned().collect())
    }

    /// Append a new block. The caller has already checked the name is free.
    pub fn append(&mut self, table: &TableDef) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(table.to_block().as_bytes())?;
        file.flush()?;
        self.blocks = None;

        info!(table = %table.name, columns = table.column_count(), "catalog block appended");
        Ok(())
    }

    /// Cut a table's block, from its marker through the following blank line
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let mut contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::TableNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let start = find_marker(&contents, name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        let end = contents[start..]
            .find("\n\n")
            .map(|offset| start + offset + 2)
            .unwrap_or(contents.len());
        contents.replace_range(start..end, "");

        fs::write(&self.path, contents)?;
        self.blocks = None;

        info!(table = %name, "catalog block removed");
        Ok(())
    }

    /// Load the raw blocks on first use
    fn blocks(&mut self) -> Result<&IndexMap<String, Vec<String>>> {
        if self.blocks.is_none() {
            let blocks = load_blocks(&self.path)?;
            debug!(path = %self.path.display(), tables = blocks.len(), "catalog loaded");
            self.blocks = Some(blocks);
        }
        Ok(self.blocks.get_or_insert_with(IndexMap::new))
    }
}

/// Byte offset of the `*name*` line, which must start a line
fn find_marker(contents: &str, name: &str) -> Option<usize> {
    let marker = format!("{}\n", name_marker(name));
    let mut from = 0;
    while let Some(offset) = contents[from..].find(&marker) {
        let pos = from + offset;
        if pos == 0 || contents.as_bytes()[pos - 1] == b'\n' {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

fn load_blocks(path: &Path) -> Result<IndexMap<String, Vec<String>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
        Err(e) => return Err(e.into()),
    };

    let mut blocks = IndexMap::new();
    let mut lines = contents.lines();
    while let Some(line) = lines.next() {
        let Some(name) = parse_name_marker(line) else {
            continue;
        };
        let mut block = vec![line.trim().to_string()];
        for line in lines.by_ref() {
            block.push(line.to_string());
            if line.trim() == BLOCK_CLOSE {
                break;
            }
        }
        // First block wins when a name appears twice
        blocks.entry(name.to_string()).or_insert(block);
    }
    Ok(blocks)
}

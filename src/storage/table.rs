//! Row file storage for flatsql
//!
//! Each table keeps its rows in one flat file, one row per line. Inserts
//! append; updates and deletes stream the file into a temporary sibling and
//! then swap it in by remove-then-rename. That replacement is not
//! atomic: a crash between the two steps leaves only the temporary file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::row::Row;
use crate::error::Result;

/// A table's row file
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name
    name: String,
    /// Row file
    path: PathBuf,
}

impl Table {
    /// Open a table's row file; the file need not exist yet
    pub fn open(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Path of the row file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary file used while rewriting
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Create the row file if it is missing
    pub fn create(&self) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(())
    }

    /// Delete the row file; a missing file is not an error
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Open the row file for reading; `None` if it does not exist
    fn reader(&self) -> Result<Option<BufReader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read every row that has exactly `arity` fields, in file order.
    /// Blank lines and malformed lines (including non-UTF-8 ones) are skipped.
    pub fn scan(&self, arity: usize) -> Result<Vec<Row>> {
        let Some(mut reader) = self.reader()? else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        let mut line = Vec::new();
        while read_line(&mut reader, &mut line)? {
            if line.is_empty() {
                continue;
            }
            match decode_line(&line, arity) {
                Some(row) => rows.push(row),
                None => debug!(
                    table = %self.name,
                    line = %String::from_utf8_lossy(&line),
                    "skipping malformed row"
                ),
            }
        }
        Ok(rows)
    }

    /// Check whether any row holds `key` in field `key_index`
    pub fn contains_key(&self, arity: usize, key_index: usize, key: &str) -> Result<bool> {
        Ok(self
            .scan(arity)?
            .iter()
            .any(|row| row.get(key_index) == Some(key)))
    }

    /// Append one row
    pub fn append(&self, row: &Row) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", row.encode())?;
        file.flush()?;
        Ok(())
    }

    /// Rewrite the file, passing every well-formed row through `decide`:
    /// `Some(row)` keeps it (possibly changed), `None` drops it. Blank lines
    /// and lines that do not decode to `arity` fields are copied byte for
    /// byte. A missing file is left missing, and a failed rewrite leaves no
    /// temporary file behind.
    pub fn rewrite<F>(&self, arity: usize, decide: F) -> Result<()>
    where
        F: FnMut(Row) -> Option<Row>,
    {
        let Some(reader) = self.reader()? else {
            return Ok(());
        };

        let temp_path = self.temp_path();
        if let Err(e) = self.copy_rows(reader, &temp_path, arity, decide) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::remove_file(&self.path)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn copy_rows<F>(
        &self,
        mut reader: BufReader<File>,
        temp_path: &Path,
        arity: usize,
        mut decide: F,
    ) -> Result<()>
    where
        F: FnMut(Row) -> Option<Row>,
    {
        let mut writer = BufWriter::new(File::create(temp_path)?);
        let mut line = Vec::new();
        while read_line(&mut reader, &mut line)? {
            if line.is_empty() {
                writeln!(writer)?;
                continue;
            }
            match decode_line(&line, arity) {
                Some(row) => {
                    if let Some(row) = decide(row) {
                        writeln!(writer, "{}", row.encode())?;
                    }
                }
                None => {
                    warn!(
                        table = %self.name,
                        line = %String::from_utf8_lossy(&line),
                        "passing malformed row through unchanged"
                    );
                    writer.write_all(&line)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// Read one line into `buf` without its line ending; `false` at end of file
fn read_line(reader: &mut impl BufRead, buf: &mut Vec<u8>) -> Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// Decode a raw line into a row of exactly `arity` fields
fn decode_line(line: &[u8], arity: usize) -> Option<Row> {
    let row = Row::decode(std::str::from_utf8(line).ok()?)?;
    (row.values().len() == arity).then_some(row)
}

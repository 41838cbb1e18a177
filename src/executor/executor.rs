//! Command Executor for flatsql
//!
//! This module runs parsed commands against the catalog and the row files.
//! Every check that can fail runs before the first write, so a rejected
//! command leaves the files as they were.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::predicate::{self, BoundPredicate};
use crate::catalog::{Catalog, TableDef};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::storage::{Row, Table};

/// Command result
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names (select only)
    pub columns: Vec<String>,
    /// Result rows (select only)
    pub rows: Vec<Vec<String>>,
    /// Number of affected rows (for INSERT/UPDATE/DELETE)
    pub affected_rows: usize,
    /// Message
    pub message: Option<String>,
    /// The session should end
    pub quit: bool,
}

impl QueryResult {
    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows: 0,
            message: Some(message.into()),
            quit: false,
        }
    }

    /// Create a result with affected rows count
    pub fn with_affected_rows(count: usize, message: impl Into<String>) -> Self {
        Self {
            affected_rows: count,
            ..Self::with_message(message)
        }
    }

    /// Create a result holding selected rows
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
            message: None,
            quit: false,
        }
    }

    /// Result of `quit`
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::with_message("Bye.")
        }
    }
}

const HELP_SUMMARY: &str = "flatsql help:
  help tables;
  help create; help drop; help describe; help insert; help select; help update; help delete;
  quit;";

/// Execution Engine
pub struct ExecutionEngine {
    /// File locations
    config: Config,
    /// Schema catalog
    catalog: Catalog,
}

impl ExecutionEngine {
    /// Create a new execution engine over the configured data directory
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::open(config.schema_path());
        Self { config, catalog }
    }

    /// The schema catalog
    pub fn catalog(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Execute one command
    pub fn execute(&mut self, command: Command) -> Result<QueryResult> {
        debug!(?command, "executing");

        match command {
            Command::Help(topic) => self.execute_help(topic.as_deref()),
            Command::CreateTable(stmt) => self.execute_create_table(stmt),
            Command::DropTable(table_name) => self.execute_drop_table(&table_name),
            Command::Describe(table_name) => self.execute_describe(&table_name),
            Command::Insert(stmt) => self.execute_insert(stmt),
            Command::Select(stmt) => self.execute_select(&stmt),
            Command::Update(stmt) => self.execute_update(&stmt),
            Command::Delete(stmt) => self.execute_delete(&stmt),
            Command::Quit => Ok(QueryResult::quit()),
        }
    }

    fn table(&self, name: &str) -> Table {
        Table::open(name, self.config.row_path(name))
    }

    fn ensure_exists(&mut self, table_name: &str) -> Result<()> {
        if self.catalog.exists(table_name)? {
            Ok(())
        } else {
            Err(Error::TableNotFound(table_name.to_string()))
        }
    }

    fn execute_help(&mut self, topic: Option<&str>) -> Result<QueryResult> {
        let text = match topic {
            None => HELP_SUMMARY.to_string(),
            Some("tables") => {
                let tables = self.catalog.list_tables()?;
                let mut text = String::from("Tables:");
                if tables.is_empty() {
                    text.push_str("\n  (none)");
                }
                for table in tables {
                    text.push_str("\n  ");
                    text.push_str(&table);
                }
                text
            }
            Some("create") => {
                "create table T(a int, b varchar(30), d date, x decimal(7,2), primary key(a));"
                    .to_string()
            }
            Some("drop") => "drop table T;".to_string(),
            Some("describe") => "describe T;".to_string(),
            Some("insert") => r#"insert into T values(1,"Name",24-02-2001,500.25);"#.to_string(),
            Some("select") => {
                r#"select * from T where a>10;  select a,b from T where b!="x";"#.to_string()
            }
            Some("update") => r#"update T set b="Z", x=123.45 where a=1;"#.to_string(),
            Some("delete") => "delete from T where a!=5;".to_string(),
            Some(other) => format!("unknown help topic {}", other),
        };
        Ok(QueryResult::with_message(text))
    }

    fn execute_create_table(&mut self, stmt: CreateTableStatement) -> Result<QueryResult> {
        let table_name = stmt.table_name;
        if self.catalog.exists(&table_name)? {
            return Err(Error::TableAlreadyExists(table_name));
        }
        if !stmt.columns.iter().any(|c| c.name == stmt.primary_key) {
            return Err(Error::PrimaryKeyNotDeclared(stmt.primary_key, table_name));
        }

        let def = TableDef::new(table_name.as_str(), stmt.columns, stmt.primary_key);
        self.catalog.append(&def)?;
        self.table(&table_name).create()?;

        info!(table = %table_name, "table created");
        Ok(QueryResult::with_message(format!(
            "Table <{}> created successfully.",
            table_name
        )))
    }

    fn execute_drop_table(&mut self, table_name: &str) -> Result<QueryResult> {
        self.ensure_exists(table_name)?;

        if let Err(e) = self.table(table_name).remove() {
            warn!(table = %table_name, error = %e, "could not delete row file");
        }
        self.catalog.remove(table_name)?;

        info!(table = %table_name, "table dropped");
        Ok(QueryResult::with_message(format!(
            "<{}> dropped successfully.",
            table_name
        )))
    }

    fn execute_describe(&mut self, table_name: &str) -> Result<QueryResult> {
        self.ensure_exists(table_name)?;
        let block = self.catalog.raw_block(table_name)?;
        Ok(QueryResult::with_message(block.join("\n")))
    }

    fn execute_insert(&mut self, stmt: InsertStatement) -> Result<QueryResult> {
        self.ensure_exists(&stmt.table_name)?;
        let def = self.catalog.read_definition(&stmt.table_name)?;

        if stmt.values.len() != def.column_count() {
            return Err(Error::ArityMismatch {
                expected: def.column_count(),
                found: stmt.values.len(),
            });
        }
        for (column, value) in def.columns.iter().zip(&stmt.values) {
            if !column.data_type.accepts(value) {
                return Err(Error::TypeMismatch {
                    column: column.name.clone(),
                    ty: column.data_type.to_string(),
                    value: value.clone(),
                });
            }
        }

        let pk_index = primary_key_index(&def)?;
        let table = self.table(&def.name);
        let key = &stmt.values[pk_index];
        if table.contains_key(def.column_count(), pk_index, key)? {
            return Err(Error::DuplicateKey(key.clone()));
        }

        table.append(&Row::new(stmt.values))?;
        Ok(QueryResult::with_affected_rows(1, "Tuple inserted successfully."))
    }

    fn execute_select(&mut self, stmt: &SelectStatement) -> Result<QueryResult> {
        self.ensure_exists(&stmt.table_name)?;
        let def = self.catalog.read_definition(&stmt.table_name)?;

        let indexes: Vec<usize> = match &stmt.projection {
            Projection::Wildcard => (0..def.column_count()).collect(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| {
                    def.column_index(name)
                        .ok_or_else(|| Error::ColumnNotFound(name.clone(), def.name.clone()))
                })
                .collect::<Result<_>>()?,
        };
        let filter = predicate::bind(stmt.where_clause.as_ref(), &def)?;

        let rows: Vec<Vec<String>> = self
            .table(&def.name)
            .scan(def.column_count())?
            .into_iter()
            .filter(|row| row_matches(&def.name, filter.as_ref(), row))
            .map(|row| {
                indexes
                    .iter()
                    .map(|&i| row.get(i).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        debug!(table = %def.name, rows = rows.len(), "select finished");
        let columns = indexes
            .iter()
            .map(|&i| def.columns[i].name.clone())
            .collect();
        Ok(QueryResult::with_rows(columns, rows))
    }

    fn execute_update(&mut self, stmt: &UpdateStatement) -> Result<QueryResult> {
        self.ensure_exists(&stmt.table_name)?;
        let def = self.catalog.read_definition(&stmt.table_name)?;

        // Later assignments to the same column win
        let mut changes: BTreeMap<usize, &str> = BTreeMap::new();
        for assignment in &stmt.assignments {
            let index = def.column_index(&assignment.column).ok_or_else(|| {
                Error::ColumnNotFound(assignment.column.clone(), def.name.clone())
            })?;
            changes.insert(index, assignment.value.as_str());
        }

        // With a WHERE clause the new key is not checked for uniqueness
        let pk_index = primary_key_index(&def)?;
        if changes.contains_key(&pk_index) && stmt.where_clause.is_none() {
            return Err(Error::PrimaryKeyUpdateWithoutWhere);
        }

        let filter = predicate::bind(stmt.where_clause.as_ref(), &def)?;
        let mut affected = 0;
        self.table(&def.name).rewrite(def.column_count(), |mut row| {
            if row_matches(&def.name, filter.as_ref(), &row) {
                for (&index, &value) in &changes {
                    row.set(index, value);
                }
                affected += 1;
            }
            Some(row)
        })?;

        info!(table = %def.name, affected, "update finished");
        Ok(QueryResult::with_affected_rows(
            affected,
            format!("{} rows affected.", affected),
        ))
    }

    fn execute_delete(&mut self, stmt: &DeleteStatement) -> Result<QueryResult> {
        self.ensure_exists(&stmt.table_name)?;
        let def = self.catalog.read_definition(&stmt.table_name)?;
        let filter = predicate::bind(stmt.where_clause.as_ref(), &def)?;

        let mut removed = 0;
        self.table(&def.name).rewrite(def.column_count(), |row| {
            if row_matches(&def.name, filter.as_ref(), &row) {
                removed += 1;
                None
            } else {
                Some(row)
            }
        })?;

        info!(table = %def.name, removed, "delete finished");
        Ok(QueryResult::with_affected_rows(
            removed,
            format!("{} rows affected.", removed),
        ))
    }
}

fn primary_key_index(def: &TableDef) -> Result<usize> {
    def.primary_key_index().ok_or_else(|| {
        Error::corrupt(
            &def.name,
            format!("primary key {} is not a column", def.primary_key),
        )
    })
}

/// A row matches when there is no filter or the filter holds. A comparison
/// error (ordering on non-numbers) rejects the row.
fn row_matches(table: &str, filter: Option<&BoundPredicate>, row: &Row) -> bool {
    match filter {
        None => true,
        Some(filter) => filter.evaluate(row).unwrap_or_else(|e| {
            warn!(table = %table, row = %row, error = %e, "row rejected by predicate error");
            false
        }),
    }
}

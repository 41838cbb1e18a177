//! Command Abstract Syntax Tree
//!
//! One variant per command kind, carrying arguments the parser has already
//! checked for shape. Schema-dependent checks happen in the executor.

use std::fmt;

use crate::catalog::Column;

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// help [topic]
    Help(Option<String>),
    /// create table ...
    CreateTable(CreateTableStatement),
    /// drop table T
    DropTable(String),
    /// describe T
    Describe(String),
    /// insert into T values(...)
    Insert(InsertStatement),
    /// select ... from T [where ...]
    Select(SelectStatement),
    /// update T set ... [where ...]
    Update(UpdateStatement),
    /// delete from T [where ...]
    Delete(DeleteStatement),
    /// quit
    Quit,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name
    pub table_name: String,
    /// Column definitions, in row field order
    pub columns: Vec<Column>,
    /// Primary key column name
    pub primary_key: String,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name
    pub table_name: String,
    /// One value per column
    pub values: Vec<String>,
}

/// Select list
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// All columns (*)
    Wildcard,
    /// Named columns, in output order
    Columns(Vec<String>),
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Source table
    pub table_name: String,
    /// Columns to print
    pub projection: Projection,
    /// WHERE clause
    pub where_clause: Option<Predicate>,
}

/// Column assignment (for UPDATE)
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Column name
    pub column: String,
    /// New value
    pub value: String,
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table name
    pub table_name: String,
    /// SET clause, in written order
    pub assignments: Vec<Assignment>,
    /// WHERE clause
    pub where_clause: Option<Predicate>,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table name
    pub table_name: String,
    /// WHERE clause
    pub where_clause: Option<Predicate>,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Gt,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Gt => write!(f, ">"),
        }
    }
}

/// Connective joining two comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// `col op value`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: String,
}

/// Flat WHERE clause: a first comparison followed by connective/comparison
/// pairs, folded strictly left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub first: Comparison,
    pub rest: Vec<(Connective, Comparison)>,
}

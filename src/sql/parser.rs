//! Command Parser
//!
//! This module turns a token sequence into a [`Command`]. Only the shape of
//! the command is checked here; anything that needs the catalog is left to
//! the executor.

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::catalog::{Column, DataType};
use crate::error::{Error, Result};

/// Command Parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from a command line
    pub fn new(line: &str) -> Self {
        Self::from_tokens(Lexer::new(line).tokenize())
    }

    /// Create a new parser over an existing token sequence
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse a single command
    pub fn parse(&mut self) -> Result<Command> {
        let Some(first) = self.current().cloned() else {
            return Err(Error::InvalidQuery);
        };
        self.advance();

        match first {
            Token::Help => self.parse_help(),
            Token::Create => self.parse_create().map(Command::CreateTable),
            Token::Drop => self.parse_drop(),
            Token::Describe => self.parse_describe(),
            Token::Insert => self.parse_insert().map(Command::Insert),
            Token::Select => self.parse_select().map(Command::Select),
            Token::Update => self.parse_update().map(Command::Update),
            Token::Delete => self.parse_delete().map(Command::Delete),
            Token::Quit => Ok(Command::Quit),
            _ => Err(Error::InvalidQuery),
        }
    }

    // ========== HELP / DROP / DESCRIBE ==========

    fn parse_help(&mut self) -> Result<Command> {
        let topic = self.current().map(Token::text);
        self.advance();
        self.expect_end("help")?;
        Ok(Command::Help(topic))
    }

    fn parse_drop(&mut self) -> Result<Command> {
        self.expect(&Token::Table, "drop")?;
        let table = self.expect_identifier("drop", "table name")?;
        self.expect_end("drop")?;
        Ok(Command::DropTable(table))
    }

    fn parse_describe(&mut self) -> Result<Command> {
        let table = self.expect_identifier("describe", "table name")?;
        self.expect_end("describe")?;
        Ok(Command::Describe(table))
    }

    // ========== CREATE TABLE ==========

    fn parse_create(&mut self) -> Result<CreateTableStatement> {
        self.expect(&Token::Table, "create")?;
        let table_name = self.expect_identifier("create", "table name")?;

        // The column list ends where `primary key` begins
        let pk_pos = self.tokens[self.position..]
            .iter()
            .position(|t| *t == Token::Primary)
            .map(|p| p + self.position)
            .ok_or(Error::MissingPrimaryKey)?;
        if self.tokens.get(pk_pos + 1) != Some(&Token::Key) {
            return Err(Error::MissingPrimaryKey);
        }
        let primary_key = match self.tokens.get(pk_pos + 2) {
            Some(Token::Identifier(name)) => name.clone(),
            _ => return Err(Error::MissingPrimaryKey),
        };
        if pk_pos + 3 < self.tokens.len() {
            return Err(Error::syntax(
                "create",
                format!("unexpected {} after primary key", self.tokens[pk_pos + 3]),
            ));
        }

        let mut columns: Vec<Column> = Vec::new();
        while self.position < pk_pos {
            let column = self.parse_column_def(pk_pos)?;
            if columns.iter().any(|c| c.name == column.name) {
                return Err(Error::syntax(
                    "create",
                    format!("duplicate column {}", column.name),
                ));
            }
            columns.push(column);
        }
        if columns.is_empty() {
            return Err(Error::syntax("create", "no columns"));
        }
        self.position = self.tokens.len();

        Ok(CreateTableStatement {
            table_name,
            columns,
            primary_key,
        })
    }

    fn parse_column_def(&mut self, end: usize) -> Result<Column> {
        let name = self.expect_identifier("create", "column name")?;
        if self.position >= end {
            return Err(Error::syntax(
                "create",
                format!("column type missing for {}", name),
            ));
        }

        let data_type = match self.tokens[self.position].clone() {
            Token::Int => {
                self.advance();
                DataType::Int
            }
            Token::Date => {
                self.advance();
                DataType::Date
            }
            Token::Varchar => {
                self.advance();
                let length = self.expect_size(end, "varchar requires a length")?;
                DataType::Varchar(length)
            }
            Token::Decimal => {
                self.advance();
                let precision = self.expect_size(end, "decimal requires precision and scale")?;
                let scale = self.expect_size(end, "decimal requires precision and scale")?;
                DataType::Decimal(precision, scale)
            }
            other => {
                return Err(Error::UnknownType {
                    column: name,
                    ty: other.text(),
                })
            }
        };

        let mut column = Column::new(name, data_type);

        // `check` runs until the primary key clause or until the next
        // `<name> <type>` pair starts
        if self.position < end && self.tokens[self.position] == Token::Check {
            self.advance();
            let mut parts = Vec::new();
            while self.position < end {
                let starts_column = matches!(self.tokens[self.position], Token::Identifier(_))
                    && self
                        .tokens
                        .get(self.position + 1)
                        .map_or(false, Token::is_type);
                if starts_column {
                    break;
                }
                parts.push(self.tokens[self.position].to_string());
                self.advance();
            }
            column = column.check(parts.join(" "));
        }

        Ok(column)
    }

    fn expect_size(&mut self, end: usize, message: &str) -> Result<usize> {
        if self.position >= end {
            return Err(Error::syntax("create", message));
        }
        match &self.tokens[self.position] {
            Token::Identifier(n) => {
                let size = n
                    .parse::<usize>()
                    .map_err(|_| Error::syntax("create", message))?;
                self.advance();
                Ok(size)
            }
            _ => Err(Error::syntax("create", message)),
        }
    }

    // ========== INSERT ==========

    fn parse_insert(&mut self) -> Result<InsertStatement> {
        self.expect(&Token::Into, "insert")?;
        let table_name = self.expect_identifier("insert", "table name")?;
        self.expect(&Token::Values, "insert")?;

        let mut values = Vec::new();
        while self.current().is_some() {
            values.push(self.expect_value("insert")?);
        }
        if values.is_empty() {
            return Err(Error::syntax("insert", "VALUES missing"));
        }

        Ok(InsertStatement { table_name, values })
    }

    // ========== SELECT ==========

    fn parse_select(&mut self) -> Result<SelectStatement> {
        let mut names = Vec::new();
        loop {
            match self.current() {
                Some(Token::From) => break,
                Some(Token::Identifier(name)) => {
                    names.push(name.clone());
                    self.advance();
                }
                Some(other) => {
                    return Err(Error::syntax(
                        "select",
                        format!("unexpected {} in column list", other),
                    ))
                }
                None => return Err(Error::syntax("select", "FROM missing")),
            }
        }
        self.advance();

        let projection = match names.as_slice() {
            [] => return Err(Error::syntax("select", "no columns")),
            [only] if only == "*" => Projection::Wildcard,
            _ => Projection::Columns(names),
        };

        let table_name = self.expect_identifier("select", "table name")?;
        let where_clause = self.parse_optional_where("select")?;

        Ok(SelectStatement {
            table_name,
            projection,
            where_clause,
        })
    }

    // ========== UPDATE ==========

    fn parse_update(&mut self) -> Result<UpdateStatement> {
        let table_name = self.expect_identifier("update", "table name")?;
        self.expect(&Token::Set, "update")?;

        let mut assignments = Vec::new();
        while self.current().is_some() && !self.check(&Token::Where) {
            let column = self.expect_identifier("update", "column name")?;
            self.expect(&Token::Eq, "update")?;
            let value = self.expect_value("update")?;
            assignments.push(Assignment { column, value });
        }
        if assignments.is_empty() {
            return Err(Error::syntax("update", "no assignments after SET"));
        }

        let where_clause = self.parse_optional_where("update")?;

        Ok(UpdateStatement {
            table_name,
            assignments,
            where_clause,
        })
    }

    // ========== DELETE ==========

    fn parse_delete(&mut self) -> Result<DeleteStatement> {
        self.expect(&Token::From, "delete")?;
        let table_name = self.expect_identifier("delete", "table name")?;
        let where_clause = self.parse_optional_where("delete")?;

        Ok(DeleteStatement {
            table_name,
            where_clause,
        })
    }

    // ========== WHERE ==========

    fn parse_optional_where(&mut self, command: &str) -> Result<Option<Predicate>> {
        if self.current().is_none() {
            return Ok(None);
        }
        self.expect(&Token::Where, command)?;

        let first = self.parse_comparison(command)?;
        let mut rest = Vec::new();
        while let Some(token) = self.current() {
            let connective = match token {
                Token::And => Connective::And,
                Token::Or => Connective::Or,
                other => {
                    return Err(Error::syntax(
                        command,
                        format!("expected AND or OR, found {}", other),
                    ))
                }
            };
            self.advance();
            rest.push((connective, self.parse_comparison(command)?));
        }

        Ok(Some(Predicate { first, rest }))
    }

    fn parse_comparison(&mut self, command: &str) -> Result<Comparison> {
        let column = self.expect_identifier(command, "column name in WHERE")?;
        let op = match self.current() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Neq) => CompareOp::Neq,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Gt) => CompareOp::Gt,
            _ => {
                return Err(Error::syntax(
                    command,
                    format!("comparison operator missing after {}", column),
                ))
            }
        };
        self.advance();
        let value = self.expect_value(command)?;

        Ok(Comparison { column, op, value })
    }

    // ========== Helpers ==========

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == Some(token)
    }

    fn expect(&mut self, token: &Token, command: &str) -> Result<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax(
                command,
                format!("{} missing", token.to_string().to_uppercase()),
            ))
        }
    }

    fn expect_identifier(&mut self, command: &str, what: &str) -> Result<String> {
        match self.current() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            Some(other) => Err(Error::syntax(
                command,
                format!("expected {}, found {}", what, other),
            )),
            None => Err(Error::syntax(command, format!("{} missing", what))),
        }
    }

    /// A literal value: any word, quoted text, or keyword spelled as a value
    fn expect_value(&mut self, command: &str) -> Result<String> {
        match self.current() {
            Some(Token::Eq | Token::Neq | Token::Lt | Token::Gt) | None => {
                Err(Error::syntax(command, "value missing"))
            }
            Some(token) => {
                let value = token.text();
                self.advance();
                Ok(value)
            }
        }
    }

    fn expect_end(&self, command: &str) -> Result<()> {
        match self.current() {
            None => Ok(()),
            Some(token) => Err(Error::syntax(
                command,
                format!("unexpected {}", token),
            )),
        }
    }
}

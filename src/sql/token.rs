//! Command token definitions
//!
//! This module defines the tokens a command line is split into.

use std::fmt;

/// Command Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // ========== Keywords ==========
    // Statements
    Help,
    Create,
    Drop,
    Describe,
    Insert,
    Select,
    Update,
    Delete,
    Quit,

    // Clauses
    Table,
    Tables,
    Primary,
    Key,
    Check,
    Into,
    Values,
    From,
    Where,
    Set,
    And,
    Or,

    // Data Types
    Int,
    Varchar,
    Date,
    Decimal,

    // ========== Words ==========
    /// Bare word: identifier, number, `*`, date, anything unquoted
    Identifier(String),
    /// `"`-delimited text, kept verbatim
    StringLiteral(String),

    // ========== Operators ==========
    /// =
    Eq,
    /// !=
    Neq,
    /// <
    Lt,
    /// >
    Gt,
}

impl Token {
    /// Check if this token names a column type
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Token::Int | Token::Varchar | Token::Date | Token::Decimal
        )
    }

    /// Try to parse a keyword from a string, ignoring case
    pub fn from_keyword(s: &str) -> Option<Token> {
        match s.to_lowercase().as_str() {
            "help" => Some(Token::Help),
            "create" => Some(Token::Create),
            "drop" => Some(Token::Drop),
            "describe" => Some(Token::Describe),
            "insert" => Some(Token::Insert),
            "select" => Some(Token::Select),
            "update" => Some(Token::Update),
            "delete" => Some(Token::Delete),
            "quit" => Some(Token::Quit),

            "table" => Some(Token::Table),
            "tables" => Some(Token::Tables),
            "primary" => Some(Token::Primary),
            "key" => Some(Token::Key),
            "check" => Some(Token::Check),
            "into" => Some(Token::Into),
            "values" => Some(Token::Values),
            "from" => Some(Token::From),
            "where" => Some(Token::Where),
            "set" => Some(Token::Set),
            "and" => Some(Token::And),
            "or" => Some(Token::Or),

            "int" => Some(Token::Int),
            "varchar" => Some(Token::Varchar),
            "date" => Some(Token::Date),
            "decimal" => Some(Token::Decimal),

            _ => None,
        }
    }

    /// Text of the token as it would appear as a stored value
    pub fn text(&self) -> String {
        match self {
            Token::Identifier(s) | Token::StringLiteral(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Help => write!(f, "help"),
            Token::Create => write!(f, "create"),
            Token::Drop => write!(f, "drop"),
            Token::Describe => write!(f, "describe"),
            Token::Insert => write!(f, "insert"),
            Token::Select => write!(f, "select"),
            Token::Update => write!(f, "update"),
            Token::Delete => write!(f, "delete"),
            Token::Quit => write!(f, "quit"),
            Token::Table => write!(f, "table"),
            Token::Tables => write!(f, "tables"),
            Token::Primary => write!(f, "primary"),
            Token::Key => write!(f, "key"),
            Token::Check => write!(f, "check"),
            Token::Into => write!(f, "into"),
            Token::Values => write!(f, "values"),
            Token::From => write!(f, "from"),
            Token::Where => write!(f, "where"),
            Token::Set => write!(f, "set"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Int => write!(f, "int"),
            Token::Varchar => write!(f, "varchar"),
            Token::Date => write!(f, "date"),
            Token::Decimal => write!(f, "decimal"),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::Eq => write!(f, "="),
            Token::Neq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
        }
    }
}

//! Data types for flatsql
//!
//! This module defines the column types and the literal checks applied to
//! inserted values.

use std::fmt;

/// Column Data Types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Integer literal
    Int,
    /// Any text; the length is recorded but not enforced
    Varchar(usize),
    /// `dd-mm-yyyy`
    Date,
    /// Numeric literal; precision and scale are recorded but not enforced
    Decimal(usize, usize),
}

impl DataType {
    /// Check whether a literal is acceptable for this type
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            DataType::Int => is_integer(value),
            DataType::Varchar(_) => true,
            DataType::Date => is_date_pattern(value),
            DataType::Decimal(_, _) => is_number(value),
        }
    }

    /// Type keyword as written in the catalog
    pub fn keyword(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Varchar(_) => "varchar",
            DataType::Date => "date",
            DataType::Decimal(_, _) => "decimal",
        }
    }

    /// Type rendered the way a catalog column line stores it
    pub fn catalog_form(&self) -> String {
        match self {
            DataType::Varchar(n) => format!("varchar {}", n),
            DataType::Decimal(p, s) => format!("decimal {} {}", p, s),
            other => other.keyword().to_string(),
        }
    }

    /// Parse a type from the words of a catalog column line (after the
    /// column name). Returns the type and how many words it consumed.
    pub fn from_catalog_words(words: &[&str]) -> Option<(DataType, usize)> {
        let size = |i: usize| words.get(i).and_then(|w| w.parse::<usize>().ok());

        match *words.first()? {
            "int" => Some((DataType::Int, 1)),
            "date" => Some((DataType::Date, 1)),
            "varchar" => Some((DataType::Varchar(size(1)?), 2)),
            "decimal" => Some((DataType::Decimal(size(1)?, size(2)?), 3)),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Varchar(n) => write!(f, "varchar({})", n),
            DataType::Date => write!(f, "date"),
            DataType::Decimal(p, s) => write!(f, "decimal({},{})", p, s),
        }
    }
}

/// Optional sign followed by one or more digits
pub fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Optional sign, digits, at most one decimal point, at least one digit
pub fn is_number(s: &str) -> bool {
    let body = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let mut dots = 0;
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return false,
        }
    }
    dots <= 1 && digits > 0
}

/// Parse a literal as a number, if it is one
pub fn parse_number(s: &str) -> Option<f64> {
    if is_number(s) {
        s.parse::<f64>().ok()
    } else {
        None
    }
}

/// `dd-mm-yyyy` by character class only; calendar validity is not checked
pub fn is_date_pattern(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

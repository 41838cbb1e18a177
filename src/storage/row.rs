//! Row type for flatsql
//!
//! A row is stored on one line as `<v1,v2,...,vn>`. Values are not escaped,
//! so a value containing `,` splits into extra fields when read back.

use std::fmt;

/// One table row: text fields in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Create a new row from its field values
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Get all values
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Get a value by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Set a value by index; out-of-range indexes are ignored
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Serialize to the on-disk line (without newline)
    pub fn encode(&self) -> String {
        format!("<{}>", self.values.join(","))
    }

    /// Parse an on-disk line; `None` if it is not wrapped in `<` `>`
    pub fn decode(line: &str) -> Option<Self> {
        let body = line.strip_prefix('<')?.strip_suffix('>')?;
        Some(Self::new(body.split(',').map(str::to_string).collect()))
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Row {
        Row::new(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_encode() {
        assert_eq!(row(&["1", "x", "24-02-2001"]).encode(), "<1,x,24-02-2001>");
        assert_eq!(row(&["1", ""]).encode(), "<1,>");
    }

    #[test]
    fn test_decode() {
        assert_eq!(Row::decode("<1,Hello World>"), Some(row(&["1", "Hello World"])));
        assert_eq!(Row::decode("<1,>"), Some(row(&["1", ""])));
        assert_eq!(Row::decode("1,2"), None);
        assert_eq!(Row::decode("<1,2"), None);
    }

    #[test]
    fn test_comma_in_value_changes_arity() {
        let stored = row(&["1", "a,b"]).encode();
        assert_eq!(Row::decode(&stored).map(|r| r.values().len()), Some(3));
    }

    #[test]
    fn test_set() {
        let mut r = row(&["1", "x"]);
        r.set(1, "z");
        r.set(5, "ignored");
        assert_eq!(r.values(), &["1".to_string(), "z".to_string()]);
        assert_eq!(r.get(0), Some("1"));
    }
}

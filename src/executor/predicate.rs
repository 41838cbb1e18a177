//! WHERE clause evaluation
//!
//! A predicate is a flat chain of comparisons joined by `and`/`or`, combined
//! strictly left to right with no precedence: `a or b and c` is
//! `(a or b) and c`.

use std::cmp::Ordering;

use crate::catalog::types::{is_integer, parse_number};
use crate::catalog::TableDef;
use crate::error::{Error, Result};
use crate::sql::ast::{CompareOp, Comparison, Connective, Predicate};
use crate::storage::Row;

/// A comparison with its column resolved to a field index
#[derive(Debug, Clone, PartialEq)]
struct BoundComparison {
    index: usize,
    op: CompareOp,
    value: String,
}

impl BoundComparison {
    fn bind(comparison: &Comparison, table: &TableDef) -> Result<Self> {
        let index = table.column_index(&comparison.column).ok_or_else(|| {
            Error::ColumnNotFound(comparison.column.clone(), table.name.clone())
        })?;
        Ok(Self {
            index,
            op: comparison.op,
            value: comparison.value.clone(),
        })
    }

    fn evaluate(&self, row: &Row) -> Result<bool> {
        let field = row.get(self.index).unwrap_or_default();
        compare(field, self.op, &self.value)
    }
}

/// A predicate bound to one table's columns
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPredicate {
    first: BoundComparison,
    rest: Vec<(Connective, BoundComparison)>,
}

impl BoundPredicate {
    /// Resolve every column the predicate names
    pub fn bind(predicate: &Predicate, table: &TableDef) -> Result<Self> {
        let first = BoundComparison::bind(&predicate.first, table)?;
        let rest = predicate
            .rest
            .iter()
            .map(|(connective, c)| Ok((*connective, BoundComparison::bind(c, table)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { first, rest })
    }

    /// Evaluate against one row. Every comparison is evaluated, and any
    /// comparison error fails the whole predicate.
    pub fn evaluate(&self, row: &Row) -> Result<bool> {
        let mut acc = self.first.evaluate(row)?;
        for (connective, comparison) in &self.rest {
            let next = comparison.evaluate(row)?;
            acc = match connective {
                Connective::And => acc && next,
                Connective::Or => acc || next,
            };
        }
        Ok(acc)
    }
}

/// Bind an optional WHERE clause
pub fn bind(predicate: Option<&Predicate>, table: &TableDef) -> Result<Option<BoundPredicate>> {
    predicate.map(|p| BoundPredicate::bind(p, table)).transpose()
}

/// Compare a stored field against a literal. Numeric when both sides are
/// numbers; otherwise only `=` and `!=` apply, as string comparisons.
/// Two integers compare exactly; anything with a decimal point goes through
/// `f64`.
pub fn compare(field: &str, op: CompareOp, literal: &str) -> Result<bool> {
    if is_integer(field) && is_integer(literal) {
        if let (Ok(a), Ok(b)) = (field.parse::<i128>(), literal.parse::<i128>()) {
            return Ok(holds(op, a.cmp(&b)));
        }
    }

    if let (Some(a), Some(b)) = (parse_number(field), parse_number(literal)) {
        return Ok(match op {
            CompareOp::Eq => a == b,
            CompareOp::Neq => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Gt => a > b,
        });
    }

    match op {
        CompareOp::Eq => Ok(field == literal),
        CompareOp::Neq => Ok(field != literal),
        CompareOp::Lt | CompareOp::Gt => Err(Error::NonNumericComparison(op.to_string())),
    }
}

fn holds(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Neq => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Gt => ordering == Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, DataType};
    use crate::sql::ast::Command;
    use crate::sql::Parser;

    fn table() -> TableDef {
        TableDef::new(
            "T",
            vec![
                Column::new("a", DataType::Int),
                Column::new("b", DataType::Varchar(10)),
                Column::new("c", DataType::Int),
            ],
            "a",
        )
    }

    fn row(values: &[&str]) -> Row {
        Row::new(values.iter().map(|v| v.to_string()).collect())
    }

    fn predicate(clause: &str) -> BoundPredicate {
        let line = format!("delete from T {};", clause);
        match Parser::new(&line).parse().unwrap() {
            Command::Delete(stmt) => {
                BoundPredicate::bind(stmt.where_clause.as_ref().unwrap(), &table()).unwrap()
            }
            _ => panic!("Expected DELETE statement"),
        }
    }

    #[test]
    fn test_numeric_comparison() {
        assert!(compare("10", CompareOp::Gt, "9").unwrap());
        assert!(compare("1.0", CompareOp::Eq, "1").unwrap());
        assert!(compare("-2", CompareOp::Lt, "0.5").unwrap());
        assert!(!compare("3", CompareOp::Neq, "3.00").unwrap());
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        // Both values round to the same f64
        let a = "9007199254740992";
        let b = "9007199254740993";
        assert!(!compare(a, CompareOp::Eq, b).unwrap());
        assert!(compare(a, CompareOp::Neq, b).unwrap());
        assert!(compare(b, CompareOp::Gt, a).unwrap());
        assert!(compare(a, CompareOp::Lt, b).unwrap());
        assert!(compare("+7", CompareOp::Eq, "7").unwrap());
        assert!(compare("-00", CompareOp::Eq, "0").unwrap());
    }

    #[test]
    fn test_string_comparison() {
        assert!(compare("x", CompareOp::Eq, "x").unwrap());
        assert!(compare("x", CompareOp::Neq, "X").unwrap());
        // one numeric side is not enough for a numeric comparison
        assert!(compare("10", CompareOp::Neq, "ten").unwrap());
    }

    #[test]
    fn test_ordering_needs_numbers() {
        assert!(matches!(
            compare("abc", CompareOp::Lt, "abd"),
            Err(Error::NonNumericComparison(_))
        ));
        assert!(compare("5", CompareOp::Gt, "x").is_err());
    }

    #[test]
    fn test_and_or() {
        let r = row(&["1", "x", "5"]);
        assert!(predicate("where a=1 and b=\"x\"").evaluate(&r).unwrap());
        assert!(!predicate("where a=1 and b=y").evaluate(&r).unwrap());
        assert!(predicate("where a=2 or c>4").evaluate(&r).unwrap());
    }

    #[test]
    fn test_left_fold_without_precedence() {
        // a=1 or a=9 and c=0 is folded as (a=1 or a=9) and c=0, so the row
        // fails even though a=1 holds.
        let r = row(&["1", "x", "5"]);
        assert!(!predicate("where a=1 or a=9 and c=0").evaluate(&r).unwrap());
        assert!(predicate("where a=1 or a=9 and c=5").evaluate(&r).unwrap());
    }

    #[test]
    fn test_error_anywhere_fails_predicate() {
        let r = row(&["1", "x", "5"]);
        assert!(predicate("where a=1 or b>\"a\"").evaluate(&r).is_err());
    }

    #[test]
    fn test_unknown_column() {
        let pred = Predicate {
            first: Comparison {
                column: "zz".to_string(),
                op: CompareOp::Eq,
                value: "1".to_string(),
            },
            rest: Vec::new(),
        };
        assert!(matches!(
            BoundPredicate::bind(&pred, &table()),
            Err(Error::ColumnNotFound(_, _))
        ));
        assert_eq!(bind(None, &table()).unwrap(), None);
    }
}

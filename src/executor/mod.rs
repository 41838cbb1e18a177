//! Command execution module
//!
//! This module contains the execution engine and WHERE clause evaluation.

pub mod executor;
pub mod predicate;

pub use executor::{ExecutionEngine, QueryResult};
pub use predicate::BoundPredicate;

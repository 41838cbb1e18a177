//! flatsql - a tiny SQL-like engine over flat text files
//!
//! This library provides the pieces of the engine:
//! - Command language (tokenizer, AST, parser)
//! - Schema catalog kept in one text file
//! - Per-table row files
//! - Command execution and WHERE evaluation
//! - An interactive session that renders results as text

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod session;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Response, Session};

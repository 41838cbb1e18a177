//! Command language module
//!
//! Tokenizer, command AST, and parser.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Command;
pub use lexer::{has_terminator, tokenize, Lexer};
pub use parser::Parser;
pub use token::Token;

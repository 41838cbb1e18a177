//! Interactive session
//!
//! A session takes one command line at a time, runs it, and renders the
//! outcome as output lines. Errors never escape a line: they become a
//! single diagnostic and the session is ready for the next command.

use std::fs;
use std::io::{self, Write};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::{ExecutionEngine, QueryResult};
use crate::sql::{has_terminator, tokenize, Parser};

/// Rendered outcome of one command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Lines to print, in order
    pub output: Vec<String>,
    /// The session should end
    pub quit: bool,
}

impl Response {
    fn lines(output: Vec<String>) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

/// A command session over one data directory
pub struct Session {
    engine: ExecutionEngine,
    column_width: usize,
}

impl Session {
    /// Start a session, creating the data directory if it is missing
    pub fn new(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let column_width = config.column_width;
        Ok(Self {
            engine: ExecutionEngine::new(config),
            column_width,
        })
    }

    /// The underlying engine
    pub fn engine(&mut self) -> &mut ExecutionEngine {
        &mut self.engine
    }

    /// Run one command line
    pub fn execute_line(&mut self, line: &str) -> Response {
        match self.try_execute(line) {
            Ok(Some(result)) => self.render(result),
            Ok(None) => Response::default(),
            Err(e) => {
                debug!(error = %e, "command failed");
                Response::lines(vec![format!("Error: {}", e)])
            }
        }
    }

    fn try_execute(&mut self, line: &str) -> Result<Option<QueryResult>> {
        if !has_terminator(line) {
            return Err(Error::MissingTerminator);
        }
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(None);
        }
        let command = Parser::from_tokens(tokens).parse()?;
        self.engine.execute(command).map(Some)
    }

    fn render(&self, result: QueryResult) -> Response {
        let mut output: Vec<String> = match &result.message {
            Some(message) => message.lines().map(str::to_string).collect(),
            None => Vec::new(),
        };

        if result.message.is_none() {
            if result.rows.is_empty() {
                output.push("(no rows)".to_string());
            }
            for row in &result.rows {
                let line: String = row
                    .iter()
                    .map(|field| format!("{:<width$}", field, width = self.column_width))
                    .collect();
                output.push(line);
            }
        }

        Response {
            output,
            quit: result.quit,
        }
    }

    /// Run command lines until `quit;` or the end of `lines`, writing every
    /// response line to `output` as soon as its command finishes
    pub fn run<I, W>(&mut self, lines: I, mut output: W) -> Result<()>
    where
        I: IntoIterator<Item = io::Result<String>>,
        W: Write,
    {
        for line in lines {
            let response = self.execute_line(&line?);
            for text in &response.output {
                writeln!(output, "{}", text)?;
            }
            output.flush()?;
            if response.quit {
                break;
            }
        }
        Ok(())
    }
}

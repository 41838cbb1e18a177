//! Command Lexer (Tokenizer)
//!
//! This module converts one command line into a sequence of tokens.

use super::token::Token;

/// Check that a command line ends with `;`, ignoring trailing whitespace
pub fn has_terminator(line: &str) -> bool {
    line.trim_end().ends_with(';')
}

/// Command Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
    /// Characters of the bare word being accumulated
    word: String,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            word: String::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            match ch {
                '"' => {
                    self.flush_word(&mut tokens);
                    self.advance();
                    tokens.push(self.read_string());
                }
                '(' | ')' | ',' | ';' => {
                    self.flush_word(&mut tokens);
                    self.advance();
                }
                c if c.is_whitespace() => {
                    self.flush_word(&mut tokens);
                    self.advance();
                }
                '!' if self.peek_char() == Some('=') => {
                    self.flush_word(&mut tokens);
                    self.advance();
                    self.advance();
                    tokens.push(Token::Neq);
                }
                '=' | '<' | '>' => {
                    self.flush_word(&mut tokens);
                    self.advance();
                    tokens.push(match ch {
                        '=' => Token::Eq,
                        '<' => Token::Lt,
                        _ => Token::Gt,
                    });
                }
                _ => {
                    self.word.push(ch);
                    self.advance();
                }
            }
        }
        self.flush_word(&mut tokens);

        tokens
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Peek at the next character
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Emit the pending bare word, as a keyword when it is one
    fn flush_word(&mut self, tokens: &mut Vec<Token>) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word);
        tokens.push(Token::from_keyword(&word).unwrap_or(Token::Identifier(word)));
    }

    /// Read a string literal; the opening quote is already consumed.
    /// A missing closing quote takes the rest of the line.
    fn read_string(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            self.advance();
            if ch == '"' {
                break;
            }
            value.push(ch);
        }

        Token::StringLiteral(value)
    }
}

/// Tokenize one command line
pub fn tokenize(line: &str) -> Vec<Token> {
    Lexer::new(line).tokenize()
}

//! Token writer
//!
//! Indentation-scoped, whitespace-tokenized text output.
//!
//! Each logical line is a keyword followed by positional arguments.
//! Indentation nests child lines under the most recent parent line:
//!
//! ```text
//! fleet "Pirate Raid"
//! 	government Pirate
//! 	add variant 2
//! 		Falcon
//! 		Bounder 3
//! ```
//!
//! Author: Moroya Sakamoto

use core::fmt;
use std::io;

use crate::config::WriterConfig;
use crate::error::WriteError;

// ── Token ──────────────────────────────────────────────────────────────

/// One whitespace-delimited value on a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Keyword or name; quoted on output when needed
    Text(String),
    /// Integer argument
    Int(i64),
    /// Floating-point argument (shortest round-trip formatting)
    Float(f64),
}

impl Token {
    /// Text form of the token, without quoting.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(String::from(s))
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(s)
    }
}

impl From<&String> for Token {
    fn from(s: &String) -> Self {
        Token::Text(s.clone())
    }
}

impl From<i32> for Token {
    fn from(v: i32) -> Self {
        Token::Int(i64::from(v))
    }
}

impl From<i64> for Token {
    fn from(v: i64) -> Self {
        Token::Int(v)
    }
}

impl From<usize> for Token {
    fn from(v: usize) -> Self {
        Token::Int(v as i64)
    }
}

impl From<f64> for Token {
    fn from(v: f64) -> Self {
        Token::Float(v)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(s) => {
                let needs_quotes = s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '#');
                if s.contains('"') {
                    write!(f, "`{s}`")
                } else if needs_quotes {
                    write!(f, "\"{s}\"")
                } else {
                    f.write_str(s)
                }
            }
            Token::Int(v) => write!(f, "{v}"),
            Token::Float(v) => write!(f, "{v}"),
        }
    }
}

// ── TokenWriter ────────────────────────────────────────────────────────

/// Destination for patch output.
pub trait TokenWriter {
    /// Append a token to the current line.
    fn write_token(&mut self, token: &Token) -> Result<(), WriteError>;

    /// Flush the current line.
    fn write(&mut self) -> Result<(), WriteError>;

    /// Open an indentation scope for child lines.
    fn begin_child(&mut self) -> Result<(), WriteError>;

    /// Close the innermost indentation scope.
    fn end_child(&mut self) -> Result<(), WriteError>;

    /// Write a complete line.
    fn write_line(&mut self, tokens: &[Token]) -> Result<(), WriteError> {
        for token in tokens {
            self.write_token(token)?;
        }
        self.write()
    }
}

// ── DataWriter ─────────────────────────────────────────────────────────

/// [`TokenWriter`] over any [`io::Write`] destination.
pub struct DataWriter<W: io::Write> {
    out: W,
    config: WriterConfig,
    depth: usize,
    line: String,
    wrote_block: bool,
}

impl DataWriter<Vec<u8>> {
    /// In-memory writer with the default layout.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: io::Write> DataWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, WriterConfig::default())
    }

    pub fn with_config(out: W, config: WriterConfig) -> Self {
        Self {
            out,
            config,
            depth: 0,
            line: String::new(),
            wrote_block: false,
        }
    }

    /// Current indentation level.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flush any pending line and return the destination.
    pub fn into_inner(mut self) -> Result<W, WriteError> {
        if !self.line.is_empty() {
            self.write()?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn flush_pending(&mut self) -> Result<(), WriteError> {
        if self.line.is_empty() {
            Ok(())
        } else {
            self.write()
        }
    }
}

impl<W: io::Write> TokenWriter for DataWriter<W> {
    fn write_token(&mut self, token: &Token) -> Result<(), WriteError> {
        if !self.line.is_empty() {
            self.line.push(' ');
        }
        self.line.push_str(&token.to_string());
        Ok(())
    }

    fn write(&mut self) -> Result<(), WriteError> {
        if self.depth == 0 && !self.line.is_empty() {
            if self.wrote_block && self.config.separate_blocks {
                self.out.write_all(b"\n")?;
            }
            self.wrote_block = true;
        }
        for _ in 0..self.depth {
            self.out.write_all(self.config.indent.as_bytes())?;
        }
        self.out.write_all(self.line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.line.clear();
        Ok(())
    }

    fn begin_child(&mut self) -> Result<(), WriteError> {
        self.flush_pending()?;
        self.depth += 1;
        Ok(())
    }

    fn end_child(&mut self) -> Result<(), WriteError> {
        self.flush_pending()?;
        if self.depth == 0 {
            return Err(WriteError::UnbalancedChild);
        }
        self.depth -= 1;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

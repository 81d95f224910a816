//! Patch directives
//!
//! The in-memory form of a record patch. A patch is computed completely
//! before anything is written, so a record's output is all-or-nothing.
//!
//! | Directive | Output |
//! |-----------|--------|
//! | `Overwrite` | `key args...` |
//! | `Add` | `add key args...` |
//! | `Remove` | `remove key args...` |
//! | `RemoveAll` | `remove key` |
//!
//! Author: Moroya Sakamoto

use crate::error::WriteError;
use crate::writer::{DataWriter, Token, TokenWriter};

/// Keyword, positional arguments, and nested child directives.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub key: String,
    pub args: Vec<Token>,
    pub children: Vec<Directive>,
}

impl Line {
    pub fn new(key: &str) -> Self {
        Self {
            key: String::from(key),
            args: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn arg(mut self, token: impl Into<Token>) -> Self {
        self.args.push(token.into());
        self
    }

    pub fn args<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn with_children(mut self, children: Vec<Directive>) -> Self {
        self.children = children;
        self
    }
}

/// One unit of patch output.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Replace the field's value
    Overwrite(Line),
    /// Add items to a collection
    Add(Line),
    /// Remove items from a collection
    Remove(Line),
    /// Remove the whole field
    RemoveAll(String),
}

impl Directive {
    pub fn overwrite(line: Line) -> Self {
        Directive::Overwrite(line)
    }

    pub fn add(line: Line) -> Self {
        Directive::Add(line)
    }

    pub fn remove(line: Line) -> Self {
        Directive::Remove(line)
    }

    pub fn remove_all(key: &str) -> Self {
        Directive::RemoveAll(String::from(key))
    }

    /// Field keyword this directive applies to.
    pub fn key(&self) -> &str {
        match self {
            Directive::Overwrite(line) | Directive::Add(line) | Directive::Remove(line) => &line.key,
            Directive::RemoveAll(key) => key,
        }
    }

    /// This directive plus every nested child directive.
    pub fn count(&self) -> usize {
        match self {
            Directive::Overwrite(line) | Directive::Add(line) | Directive::Remove(line) => {
                1 + line.children.iter().map(Directive::count).sum::<usize>()
            }
            Directive::RemoveAll(_) => 1,
        }
    }

    pub fn write_to<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<(), WriteError> {
        let (prefix, line) = match self {
            Directive::Overwrite(line) => (None, line),
            Directive::Add(line) => (Some("add"), line),
            Directive::Remove(line) => (Some("remove"), line),
            Directive::RemoveAll(key) => {
                writer.write_token(&Token::from("remove"))?;
                writer.write_token(&Token::from(key.as_str()))?;
                return writer.write();
            }
        };
        if let Some(prefix) = prefix {
            writer.write_token(&Token::from(prefix))?;
        }
        writer.write_token(&Token::from(line.key.as_str()))?;
        for arg in &line.args {
            writer.write_token(arg)?;
        }
        writer.write()?;
        if !line.children.is_empty() {
            writer.begin_child()?;
            for child in &line.children {
                child.write_to(writer)?;
            }
            writer.end_child()?;
        }
        Ok(())
    }
}

// ── Patch ──────────────────────────────────────────────────────────────

/// How a patch was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    /// No base record: every non-default field in full
    Full,
    /// Only the fields that differ from the base record
    Diff,
}

/// Every directive for one record, under its top-level block.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Record keyword (`fleet`, `system`)
    pub kind: &'static str,
    pub name: String,
    pub mode: PatchMode,
    pub directives: Vec<Directive>,
}

impl Patch {
    pub fn new(kind: &'static str, name: &str, mode: PatchMode) -> Self {
        Self {
            kind,
            name: String::from(name),
            mode,
            directives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Total directives including nested children.
    pub fn directive_count(&self) -> usize {
        self.directives.iter().map(Directive::count).sum()
    }

    pub fn write_to<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_token(&Token::from(self.kind))?;
        writer.write_token(&Token::from(self.name.as_str()))?;
        writer.write()?;
        if !self.directives.is_empty() {
            writer.begin_child()?;
            for directive in &self.directives {
                directive.write_to(writer)?;
            }
            writer.end_child()?;
        }
        Ok(())
    }

    /// Render with the default writer layout.
    pub fn to_text(&self) -> Result<String, WriteError> {
        let mut writer = DataWriter::buffer();
        self.write_to(&mut writer)?;
        Ok(writer.contents())
    }
}

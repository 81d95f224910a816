//! Writer configuration
//!
//! Author: Moroya Sakamoto

use serde::{Deserialize, Serialize};

/// Output layout options for [`crate::writer::DataWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// String written once per indentation level.
    pub indent: String,
    /// Leave an empty line between consecutive top-level blocks.
    pub separate_blocks: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: String::from("\t"),
            separate_blocks: true,
        }
    }
}

impl WriterConfig {
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = String::from(indent);
        self
    }
}

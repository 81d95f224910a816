//! Error types
//!
//! Diff computation itself is total and never fails. Errors only come
//! from the collaborators around it: the token writer, flag decoding of
//! loaded data, and the editing session.
//!
//! Author: Moroya Sakamoto

use thiserror::Error;

/// Errors raised while writing tokens to a destination.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The underlying destination could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `end_child` was called without a matching `begin_child`.
    #[error("end_child called at indentation level 0")]
    UnbalancedChild,
}

/// Errors raised while decoding flag tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    /// The token is not part of the flag table.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
}

/// Tree index invariant violations.
///
/// These never occur when nodes are only added and removed through
/// [`crate::tree::IndexedTree`]; the checker exists for assertions and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A parent index points at itself, a later node, or past the end.
    #[error("node {node} has inconsistent parent index {parent}")]
    InconsistentIndex { node: usize, parent: usize },
}

/// Errors raised by the editing session.
#[derive(Debug, Error)]
pub enum EditorError {
    /// No working record with this name.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A working record with this name already exists.
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// The operation is only allowed on records created in this session.
    #[error("record has a base definition: {0}")]
    HasBaseDefinition(String),

    /// A system cannot be linked to itself.
    #[error("system cannot link to itself: {0}")]
    SelfLink(String),

    /// Writing a patch failed.
    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

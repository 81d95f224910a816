//! Diff emitter
//!
//! Turns a working record and its optional base into a [`Patch`]. Record
//! kinds describe their own fields through [`Record::directives`]; the
//! emitter decides the patch mode, skips records equal to their base, and
//! only writes once every directive has been computed.
//!
//! Author: Moroya Sakamoto

use tracing::debug;

use crate::directive::{Directive, Patch, PatchMode};
use crate::error::WriteError;
use crate::registry::Definitions;
use crate::writer::TokenWriter;

/// A named, editable record kind.
pub trait Record: Clone + PartialEq {
    /// Top-level keyword (`fleet`, `system`).
    const KIND: &'static str;

    /// Empty record with every field at its default.
    fn named(name: &str) -> Self;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// Copy of this record under a new name. Kinds whose copies must not
    /// share some state with the source override this.
    fn cloned_as(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.set_name(name);
        copy
    }

    /// Directives for every field group, in the kind's fixed order.
    ///
    /// With `base == None` every non-default field is written in full.
    /// Otherwise only groups unequal to the base's are visited.
    fn directives(&self, base: Option<&Self>, defs: &Definitions) -> Vec<Directive>;
}

/// Computes and writes record patches against a set of loaded definitions.
#[derive(Debug, Clone, Copy)]
pub struct DiffEmitter<'a> {
    defs: &'a Definitions,
}

impl<'a> DiffEmitter<'a> {
    pub fn new(defs: &'a Definitions) -> Self {
        Self { defs }
    }

    pub fn definitions(&self) -> &'a Definitions {
        self.defs
    }

    /// Compute the full patch for `working`.
    pub fn patch<R: Record>(&self, working: &R, base: Option<&R>) -> Patch {
        let mode = match base {
            Some(_) => PatchMode::Diff,
            None => PatchMode::Full,
        };
        let mut patch = Patch::new(R::KIND, working.name(), mode);
        if base != Some(working) {
            patch.directives = working.directives(base, self.defs);
        }
        debug!(
            kind = R::KIND,
            record = working.name(),
            directives = patch.directive_count(),
            mode = ?mode,
            "computed patch"
        );
        patch
    }

    /// Compute the patch for `working`, then write it. Nothing is written
    /// for a diff that turned out empty.
    pub fn emit<R, W>(&self, working: &R, base: Option<&R>, writer: &mut W) -> Result<Patch, WriteError>
    where
        R: Record,
        W: TokenWriter + ?Sized,
    {
        let patch = self.patch(working, base);
        if patch.mode == PatchMode::Full || !patch.is_empty() {
            patch.write_to(writer)?;
        }
        Ok(patch)
    }
}

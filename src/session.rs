//! Editing session
//!
//! Tracks which working records changed since they were last saved,
//! keeps the last saved copy of each for `reset`, and writes patches for
//! every dirty record on `save`.
//!
//! Author: Moroya Sakamoto

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::directive::PatchMode;
use crate::emit::{DiffEmitter, Record};
use crate::error::EditorError;
use crate::registry::Definitions;
use crate::store::{Catalog, RecordStore};
use crate::system::System;
use crate::writer::TokenWriter;

/// Editor state for one record kind.
#[derive(Debug, Clone)]
pub struct Session<R> {
    catalog: Catalog<R>,
    dirty: BTreeSet<String>,
    saved: BTreeMap<String, R>,
}

impl<R: Record> Default for Session<R> {
    fn default() -> Self {
        Self::new(Catalog::new())
    }
}

impl<R: Record> Session<R> {
    pub fn new(catalog: Catalog<R>) -> Self {
        Self {
            catalog,
            dirty: BTreeSet::new(),
            saved: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog<R> {
        &self.catalog
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.catalog.lookup(name)
    }

    /// Mutable access to a working record; marks it dirty.
    pub fn edit(&mut self, name: &str) -> Result<&mut R, EditorError> {
        let record = self
            .catalog
            .get_mut(name)
            .ok_or_else(|| EditorError::NotFound(String::from(name)))?;
        self.dirty.insert(String::from(name));
        Ok(record)
    }

    // ── Dirty tracking ─────────────────────────────────────────────────

    pub fn mark_dirty(&mut self, name: &str) {
        self.dirty.insert(String::from(name));
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Dirty record names in order.
    pub fn dirty_names(&self) -> Vec<&str> {
        self.dirty.iter().map(String::as_str).collect()
    }

    // ── Record lifecycle ───────────────────────────────────────────────

    fn ensure_free(&self, name: &str) -> Result<(), EditorError> {
        if self.catalog.exists(name) {
            Err(EditorError::AlreadyExists(String::from(name)))
        } else {
            Ok(())
        }
    }

    fn ensure_editor_owned(&self, name: &str) -> Result<(), EditorError> {
        if !self.catalog.exists(name) {
            Err(EditorError::NotFound(String::from(name)))
        } else if self.catalog.has_base(name) {
            Err(EditorError::HasBaseDefinition(String::from(name)))
        } else {
            Ok(())
        }
    }

    /// New empty record.
    pub fn create(&mut self, name: &str) -> Result<&mut R, EditorError> {
        self.ensure_free(name)?;
        info!(kind = R::KIND, record = name, "created record");
        self.dirty.insert(String::from(name));
        Ok(self.catalog.get_or_create(name))
    }

    /// Copy of `source` under a new name, made by [`Record::cloned_as`].
    pub fn clone_as(&mut self, source: &str, name: &str) -> Result<&mut R, EditorError> {
        self.ensure_free(name)?;
        let copy = self
            .catalog
            .lookup(source)
            .map(|record| record.cloned_as(name))
            .ok_or_else(|| EditorError::NotFound(String::from(source)))?;
        self.catalog.restore(copy);
        info!(kind = R::KIND, source, record = name, "cloned record");
        self.dirty.insert(String::from(name));
        self.catalog
            .get_mut(name)
            .ok_or_else(|| EditorError::NotFound(String::from(name)))
    }

    /// Rename a record created in the editor.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), EditorError> {
        self.ensure_editor_owned(old)?;
        self.ensure_free(new)?;
        if !self.catalog.rename(old, new) {
            return Err(EditorError::NotFound(String::from(old)));
        }
        if let Some(mut saved) = self.saved.remove(old) {
            saved.set_name(new);
            self.saved.insert(String::from(new), saved);
        }
        self.dirty.remove(old);
        self.dirty.insert(String::from(new));
        info!(kind = R::KIND, old, new, "renamed record");
        Ok(())
    }

    /// Delete a record created in the editor.
    pub fn delete(&mut self, name: &str) -> Result<R, EditorError> {
        self.ensure_editor_owned(name)?;
        let record = self
            .catalog
            .erase(name)
            .ok_or_else(|| EditorError::NotFound(String::from(name)))?;
        self.dirty.remove(name);
        self.saved.remove(name);
        info!(kind = R::KIND, record = name, "deleted record");
        Ok(record)
    }

    /// Undo unsaved edits: back to the last saved copy, else the base
    /// definition. A record with neither is deleted.
    pub fn reset(&mut self, name: &str) -> Result<(), EditorError> {
        if !self.catalog.exists(name) {
            return Err(EditorError::NotFound(String::from(name)));
        }
        let restored = self
            .saved
            .get(name)
            .or_else(|| self.catalog.base_lookup(name))
            .cloned();
        match restored {
            Some(record) => {
                self.catalog.restore(record);
                info!(kind = R::KIND, record = name, "reset record");
            }
            None => {
                self.catalog.erase(name);
                info!(kind = R::KIND, record = name, "reset removed unsaved record");
            }
        }
        self.dirty.remove(name);
        Ok(())
    }

    // ── Save ───────────────────────────────────────────────────────────

    /// Write the patch of every dirty record, in name order. Returns the
    /// number of records whose patch was non-empty.
    ///
    /// Each record's patch is computed completely before it is written.
    /// On a write error the failing record and every record after it stay
    /// dirty.
    pub fn save<W>(&mut self, defs: &Definitions, writer: &mut W) -> Result<usize, EditorError>
    where
        W: TokenWriter + ?Sized,
    {
        let emitter = DiffEmitter::new(defs);
        let names: Vec<String> = self.dirty.iter().cloned().collect();
        let mut written = 0;
        for name in names {
            let Some(working) = self.catalog.lookup(&name) else {
                warn!(kind = R::KIND, record = %name, "dirty record no longer exists");
                self.dirty.remove(&name);
                continue;
            };
            let base = self.catalog.base_lookup(&name);
            let patch = emitter.emit(working, base, writer)?;
            if patch.mode == PatchMode::Full || !patch.is_empty() {
                written += 1;
            }
            self.saved.insert(name.clone(), working.clone());
            self.dirty.remove(&name);
        }
        info!(kind = R::KIND, written, "saved records");
        Ok(written)
    }
}

// ── Hyperspace links ───────────────────────────────────────────────────

impl Session<System> {
    /// Link two systems both ways. Both records become dirty.
    pub fn link(&mut self, a: &str, b: &str) -> Result<(), EditorError> {
        self.edit_link_pair(a, b, |links, other| {
            links.insert(String::from(other));
        })?;
        info!(a, b, "linked systems");
        Ok(())
    }

    /// Remove the link between two systems from both sides. Both records
    /// become dirty.
    pub fn unlink(&mut self, a: &str, b: &str) -> Result<(), EditorError> {
        self.edit_link_pair(a, b, |links, other| {
            links.remove(other);
        })?;
        info!(a, b, "unlinked systems");
        Ok(())
    }

    fn edit_link_pair<F>(&mut self, a: &str, b: &str, mut update: F) -> Result<(), EditorError>
    where
        F: FnMut(&mut BTreeSet<String>, &str),
    {
        if a == b {
            return Err(EditorError::SelfLink(String::from(a)));
        }
        for name in [a, b] {
            if !self.catalog.exists(name) {
                return Err(EditorError::NotFound(String::from(name)));
            }
        }
        for (this, other) in [(a, b), (b, a)] {
            let system = self.edit(this)?;
            update(&mut system.links, other);
        }
        Ok(())
    }
}

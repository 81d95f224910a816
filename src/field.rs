//! Field diff primitives
//!
//! Small, pure functions turning one field's working value and optional
//! base value into directives. `None` for the base always means "no base
//! record" and selects full emission.
//!
//! Author: Moroya Sakamoto

use std::collections::{BTreeMap, BTreeSet};

use crate::directive::{Directive, Line};
use crate::flags::{Flag, FlagPatch};
use crate::registry::{Handle, Kind, Registry};
use crate::runlength::ListPatch;
use crate::writer::Token;

// ── Scalars ────────────────────────────────────────────────────────────

/// Overwrite when the value differs from the base, or from `default`
/// when there is no base.
pub fn scalar<T, F>(working: &T, base: Option<&T>, default: &T, line: F) -> Option<Directive>
where
    T: PartialEq,
    F: FnOnce(&T) -> Line,
{
    let changed = match base {
        Some(base) => working != base,
        None => working != default,
    };
    changed.then(|| Directive::overwrite(line(working)))
}

/// Reference to an interned definition, compared by identity.
///
/// A working reference that is unset (or dangling) against a base that has
/// one becomes a wholesale removal.
pub fn reference<K: Kind>(
    key: &str,
    working: Option<Handle<K>>,
    base: Option<Option<Handle<K>>>,
    registry: &Registry<K>,
) -> Option<Directive> {
    if base == Some(working) {
        return None;
    }
    match registry.resolve(working) {
        Some(name) => Some(Directive::overwrite(Line::new(key).arg(name))),
        None => {
            let base_name = base.and_then(|b| registry.resolve(b));
            base_name.map(|_| Directive::remove_all(key))
        }
    }
}

/// Free-form text where the empty string means unset.
pub fn text(key: &str, working: &str, base: Option<&str>) -> Option<Directive> {
    if base == Some(working) {
        return None;
    }
    if !working.is_empty() {
        Some(Directive::overwrite(Line::new(key).arg(working)))
    } else if base.is_some_and(|b| !b.is_empty()) {
        Some(Directive::remove_all(key))
    } else {
        None
    }
}

/// Presence flag written as a bare keyword.
pub fn presence(key: &str, working: bool, base: Option<bool>) -> Option<Directive> {
    if base == Some(working) {
        return None;
    }
    if working {
        Some(Directive::overwrite(Line::new(key)))
    } else if base == Some(true) {
        Some(Directive::remove_all(key))
    } else {
        None
    }
}

// ── Sets ───────────────────────────────────────────────────────────────

/// Line layout of a set-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetStyle {
    /// `key a b c` on one line
    Inline,
    /// `key a`, `key b`, ... one line per element
    PerItem,
}

fn set_lines(key: &str, items: &[&String], style: SetStyle) -> Vec<Line> {
    match style {
        SetStyle::Inline => vec![Line::new(key).args(items.iter().copied())],
        SetStyle::PerItem => items.iter().map(|i| Line::new(key).arg(*i)).collect(),
    }
}

/// Unordered, unique elements diffed by set difference.
pub fn set(
    key: &str,
    working: &BTreeSet<String>,
    base: Option<&BTreeSet<String>>,
    style: SetStyle,
) -> Vec<Directive> {
    let Some(base) = base else {
        let all: Vec<&String> = working.iter().collect();
        if all.is_empty() {
            return Vec::new();
        }
        return set_lines(key, &all, style)
            .into_iter()
            .map(Directive::overwrite)
            .collect();
    };
    if working == base {
        return Vec::new();
    }
    if working.is_empty() {
        return vec![Directive::remove_all(key)];
    }
    let add: Vec<&String> = working.difference(base).collect();
    let remove: Vec<&String> = base.difference(working).collect();
    let mut out = Vec::new();
    if !add.is_empty() {
        out.extend(set_lines(key, &add, style).into_iter().map(Directive::add));
    }
    if !remove.is_empty() {
        out.extend(set_lines(key, &remove, style).into_iter().map(Directive::remove));
    }
    out
}

/// Set of interned references, diffed by name after resolving.
pub fn reference_set<K: Kind>(
    key: &str,
    working: &BTreeSet<Handle<K>>,
    base: Option<&BTreeSet<Handle<K>>>,
    registry: &Registry<K>,
    style: SetStyle,
) -> Vec<Directive> {
    if base == Some(working) {
        return Vec::new();
    }
    let names = |handles: &BTreeSet<Handle<K>>| -> BTreeSet<String> {
        registry.resolve_all(handles).into_iter().collect()
    };
    let base_names = base.map(names);
    set(key, &names(working), base_names.as_ref(), style)
}

// ── Keyed maps ─────────────────────────────────────────────────────────

/// `key name value` entries. Changed and new entries are overwritten in
/// place; a dropped entry can only be expressed by clearing the whole map
/// and writing every remaining entry.
pub fn keyed_map(
    key: &str,
    working: &BTreeMap<String, i32>,
    base: Option<&BTreeMap<String, i32>>,
) -> Vec<Directive> {
    let entry = |(name, value): (&String, &i32)| {
        Directive::overwrite(Line::new(key).arg(name).arg(*value))
    };
    let Some(base) = base else {
        return working.iter().map(entry).collect();
    };
    if working == base {
        return Vec::new();
    }
    if working.is_empty() {
        return vec![Directive::remove_all(key)];
    }
    if base.keys().any(|k| !working.contains_key(k)) {
        let mut out = vec![Directive::remove_all(key)];
        out.extend(working.iter().map(entry));
        return out;
    }
    working
        .iter()
        .filter(|(name, value)| base.get(*name) != Some(*value))
        .map(entry)
        .collect()
}

// ── Flags and lists ────────────────────────────────────────────────────

fn flag_line(flags: &[&'static str]) -> Option<Line> {
    let (first, rest) = flags.split_first()?;
    Some(Line::new(first).args(rest.iter().copied()))
}

/// Lines for a flag group's body. `RemoveAll` yields nothing here; the
/// caller writes the wholesale removal at the group's level.
pub fn flag_lines<F: Flag>(patch: &FlagPatch<F>) -> Vec<Directive> {
    match patch {
        FlagPatch::Unchanged | FlagPatch::RemoveAll => Vec::new(),
        FlagPatch::Full(set) => flag_line(&set.encode())
            .map(Directive::overwrite)
            .into_iter()
            .collect(),
        FlagPatch::Partial(delta) => {
            let mut out = Vec::new();
            if let Some(line) = flag_line(&delta.add.encode()) {
                out.push(Directive::add(line));
            }
            if let Some(line) = flag_line(&delta.remove.encode()) {
                out.push(Directive::remove(line));
            }
            out
        }
    }
}

/// Directives for an ordered list, one line (with children) per item.
/// Items whose line is `None` (an unresolved reference) are skipped.
pub fn list<T, F>(key: &str, patch: ListPatch<T>, mut line: F) -> Vec<Directive>
where
    F: FnMut(&T) -> Option<Line>,
{
    match patch {
        ListPatch::Unchanged => Vec::new(),
        ListPatch::RemoveAll => vec![Directive::remove_all(key)],
        ListPatch::Full(items) => items
            .iter()
            .filter_map(&mut line)
            .map(Directive::overwrite)
            .collect(),
        ListPatch::Replace(items) => {
            let out: Vec<Directive> = items
                .iter()
                .filter_map(&mut line)
                .map(Directive::overwrite)
                .collect();
            if out.is_empty() {
                vec![Directive::remove_all(key)]
            } else {
                out
            }
        }
        ListPatch::Partial(delta) => {
            let mut out: Vec<Directive> = delta
                .add
                .iter()
                .filter_map(&mut line)
                .map(Directive::add)
                .collect();
            out.extend(delta.remove.iter().filter_map(&mut line).map(Directive::remove));
            out
        }
    }
}

/// Float argument helper for `scalar`.
pub fn number_line(key: &str) -> impl FnOnce(&f64) -> Line + '_ {
    move |v| Line::new(key).arg(Token::Float(*v))
}

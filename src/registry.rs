//! Interned definition registry
//!
//! Shared, named game definitions (governments, phrases, ship templates,
//! ...) are loaded once per content-loading phase and referenced from
//! records by [`Handle`]. Two handles are equal only if they point at the
//! same interned entry; names are never compared.
//!
//! Author: Moroya Sakamoto

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use std::collections::HashMap;

use tracing::warn;

/// Marker for a family of interned definitions.
pub trait Kind: 'static {
    /// Name used in log output.
    const LABEL: &'static str;
}

macro_rules! kinds {
    ($($(#[$doc:meta])* $name:ident => $label:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug)]
            pub enum $name {}

            impl Kind for $name {
                const LABEL: &'static str = $label;
            }
        )*
    };
}

kinds! {
    /// Faction owning fleets and systems
    Government => "government",
    /// Random name generator
    Phrase => "phrase",
    /// Outfit sale list
    Outfitter => "outfitter",
    /// Ship template (variant name)
    ShipModel => "ship",
    /// Landable planet
    Planet => "planet",
    /// Sprite / image asset
    Sprite => "sprite",
    /// Environmental hazard
    Hazard => "hazard",
    /// Mineable asteroid type
    Minable => "minable",
}

// ── Handle ─────────────────────────────────────────────────────────────

/// Stable reference to an interned definition.
pub struct Handle<K> {
    index: u32,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
    const fn new(index: u32) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    /// Slot in the owning registry.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for Handle<K> {}

impl<K> PartialOrd for Handle<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Handle<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K: Kind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", K::LABEL, self.index)
    }
}

// ── Registry ───────────────────────────────────────────────────────────

/// Deduplicating name table for one kind of definition.
pub struct Registry<K> {
    names: Vec<String>,
    index: HashMap<String, u32>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}

impl<K> Registry<K> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            index: HashMap::new(),
            _kind: PhantomData,
        }
    }

    /// Handle for `name`, creating the entry on first use.
    pub fn intern(&mut self, name: &str) -> Handle<K> {
        if let Some(&idx) = self.index.get(name) {
            return Handle::new(idx);
        }
        let idx = self.names.len() as u32;
        self.names.push(String::from(name));
        self.index.insert(String::from(name), idx);
        Handle::new(idx)
    }

    /// Handle for an already interned `name`.
    pub fn get(&self, name: &str) -> Option<Handle<K>> {
        self.index.get(name).map(|&idx| Handle::new(idx))
    }

    /// Name of the definition behind `handle`, if it is still loaded.
    pub fn name(&self, handle: Handle<K>) -> Option<&str> {
        self.names.get(handle.index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every `(handle, name)` in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<K>, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (Handle::new(i as u32), n.as_str()))
    }

    /// Drop every definition. Outstanding handles become dangling.
    pub fn clear(&mut self) {
        self.names.clear();
        self.index.clear();
    }
}

impl<K: Kind> Registry<K> {
    /// Name behind an optional reference. A dangling handle is treated as
    /// an absent field.
    pub fn resolve(&self, handle: Option<Handle<K>>) -> Option<&str> {
        let handle = handle?;
        let name = self.name(handle);
        if name.is_none() {
            warn!(kind = K::LABEL, index = handle.index, "dangling reference treated as absent");
        }
        name
    }

    /// Sorted names of a handle collection, skipping dangling handles.
    pub fn resolve_all<'a, I>(&self, handles: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Handle<K>>,
    {
        let mut names: Vec<String> = handles
            .into_iter()
            .filter_map(|&h| self.resolve(Some(h)))
            .map(String::from)
            .collect();
        names.sort();
        names
    }
}

// ── Definitions ────────────────────────────────────────────────────────

/// Every registry the record kinds refer to.
#[derive(Debug, Default)]
pub struct Definitions {
    pub governments: Registry<Government>,
    pub phrases: Registry<Phrase>,
    pub outfitters: Registry<Outfitter>,
    pub ships: Registry<ShipModel>,
    pub planets: Registry<Planet>,
    pub sprites: Registry<Sprite>,
    pub hazards: Registry<Hazard>,
    pub minables: Registry<Minable>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down every registry at the end of a loading phase.
    pub fn clear(&mut self) {
        self.governments.clear();
        self.phrases.clear();
        self.outfitters.clear();
        self.ships.clear();
        self.planets.clear();
        self.sprites.clear();
        self.hazards.clear();
        self.minables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut reg: Registry<Government> = Registry::new();
        let a = reg.intern("Pirate");
        let b = reg.intern("Pirate");
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_distinct_names_distinct_handles() {
        let mut reg: Registry<Government> = Registry::new();
        let a = reg.intern("Pirate");
        let b = reg.intern("Republic");
        assert_ne!(a, b);
        assert_eq!(reg.name(b), Some("Republic"));
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut reg: Registry<Phrase> = Registry::new();
        assert!(reg.get("pirate names").is_none());
        let h = reg.intern("pirate names");
        assert_eq!(reg.get("pirate names"), Some(h));
    }

    #[test]
    fn test_identity_not_name_equality() {
        // Handles from separate registries that happen to carry the same
        // name are still compared by slot only.
        let mut first: Registry<Sprite> = Registry::new();
        let mut second: Registry<Sprite> = Registry::new();
        second.intern("padding");
        let a = first.intern("haze/blue");
        let b = second.intern("haze/blue");
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear_makes_handles_dangling() {
        let mut reg: Registry<Hazard> = Registry::new();
        let h = reg.intern("ion storm");
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.name(h), None);
        assert_eq!(reg.resolve(Some(h)), None);
    }

    #[test]
    fn test_resolve_none_is_none() {
        let reg: Registry<Planet> = Registry::new();
        assert_eq!(reg.resolve(None), None);
    }

    #[test]
    fn test_resolve_all_sorts_and_skips_dangling() {
        let mut reg: Registry<Outfitter> = Registry::new();
        let z = reg.intern("Zeta Outfits");
        let a = reg.intern("Alpha Outfits");
        let dangling = Handle::new(42);
        assert_eq!(
            reg.resolve_all(&[z, dangling, a]),
            vec![String::from("Alpha Outfits"), String::from("Zeta Outfits")]
        );
    }

    #[test]
    fn test_iter_in_interning_order() {
        let mut reg: Registry<ShipModel> = Registry::new();
        reg.intern("Falcon");
        reg.intern("Bounder");
        let names: Vec<&str> = reg.iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["Falcon", "Bounder"]);
    }

    #[test]
    fn test_handle_debug_shows_kind() {
        let mut reg: Registry<Minable> = Registry::new();
        let h = reg.intern("iron");
        assert_eq!(format!("{h:?}"), "minable#0");
    }

    #[test]
    fn test_definitions_clear() {
        let mut defs = Definitions::new();
        defs.governments.intern("Pirate");
        defs.ships.intern("Falcon");
        defs.clear();
        assert!(defs.governments.is_empty());
        assert!(defs.ships.is_empty());
    }
}

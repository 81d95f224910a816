//! Flag-set codec
//!
//! A closed enumeration of named boolean traits stored as a compact bit
//! set. The bit assigned to each trait is fixed by the enumeration, so
//! encoding always walks the table from the lowest bit to the highest
//! and equal sets produce identical token lists no matter how the bits
//! were set.
//!
//! Author: Moroya Sakamoto

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, BitXor, Sub};

use crate::error::FlagError;

/// A named boolean trait with a stable bit position.
pub trait Flag: Copy + Eq + fmt::Debug + 'static {
    /// Every flag, in bit order. Must not be reordered between versions.
    const ALL: &'static [Self];

    /// Bit position (0..64).
    fn bit(self) -> u32;

    /// Token written for this flag.
    fn token(self) -> &'static str;

    /// Look up a flag by its token.
    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.token() == token)
    }
}

// ── FlagSet ────────────────────────────────────────────────────────────

/// Set of flags backed by a 64-bit mask.
pub struct FlagSet<F> {
    bits: u64,
    _flag: PhantomData<F>,
}

impl<F> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSet<F> {}

impl<F> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for FlagSet<F> {}

impl<F> Hash for FlagSet<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F> Default for FlagSet<F> {
    fn default() -> Self {
        Self::from_bits(0)
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.encode()).finish()
    }
}

impl<F> FlagSet<F> {
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Raw mask.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True if every flag of `other` is also in `self`.
    pub fn contains_all(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl<F: Flag> FlagSet<F> {
    pub fn contains(&self, flag: F) -> bool {
        self.bits & (1 << flag.bit()) != 0
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= 1 << flag.bit();
    }

    pub fn remove(&mut self, flag: F) {
        self.bits &= !(1 << flag.bit());
    }

    /// Set or clear a flag, returning true if the set changed.
    pub fn set(&mut self, flag: F, on: bool) -> bool {
        let before = self.bits;
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
        before != self.bits
    }

    /// Flags in table order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |&f| self.contains(f))
    }

    /// Token list in table order.
    pub fn encode(&self) -> Vec<&'static str> {
        self.iter().map(F::token).collect()
    }

    /// Parse a token list. Duplicate tokens are harmless.
    pub fn decode<'a, I>(tokens: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::empty();
        for token in tokens {
            let flag =
                F::from_token(token).ok_or_else(|| FlagError::UnknownFlag(String::from(token)))?;
            set.insert(flag);
        }
        Ok(set)
    }

    /// Flags to add and remove to turn `base` into `self`.
    pub fn delta(&self, base: &Self) -> FlagDelta<F> {
        let changed = self.bits ^ base.bits;
        FlagDelta {
            add: Self::from_bits(changed & self.bits),
            remove: Self::from_bits(changed & base.bits),
        }
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<F> BitOr for FlagSet<F> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl<F> BitAnd for FlagSet<F> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl<F> BitXor for FlagSet<F> {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits ^ rhs.bits)
    }
}

impl<F> Sub for FlagSet<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_bits(self.bits & !rhs.bits)
    }
}

// ── Delta ──────────────────────────────────────────────────────────────

/// Symmetric difference split into additions and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDelta<F: Flag> {
    pub add: FlagSet<F>,
    pub remove: FlagSet<F>,
}

impl<F: Flag> FlagDelta<F> {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// How a flag group should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPatch<F: Flag> {
    /// Nothing to write
    Unchanged,
    /// No base: every set flag as a flat list
    Full(FlagSet<F>),
    /// The whole group is removed with a single directive
    RemoveAll,
    /// Per-flag additions and removals
    Partial(FlagDelta<F>),
}

/// Decide how to write `working` relative to an optional `base`.
///
/// The wholesale form wins whenever it is legal: the base is non-empty,
/// every base flag is removed, and nothing is added.
pub fn plan_flags<F: Flag>(working: &FlagSet<F>, base: Option<&FlagSet<F>>) -> FlagPatch<F> {
    let Some(base) = base else {
        return if working.is_empty() {
            FlagPatch::Unchanged
        } else {
            FlagPatch::Full(*working)
        };
    };
    let delta = working.delta(base);
    if delta.is_empty() {
        FlagPatch::Unchanged
    } else if working.is_empty() && delta.remove == *base {
        FlagPatch::RemoveAll
    } else {
        FlagPatch::Partial(delta)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mood {
        Calm,
        Angry,
        Sleepy,
        Happy,
    }

    impl Flag for Mood {
        const ALL: &'static [Self] = &[Mood::Calm, Mood::Angry, Mood::Sleepy, Mood::Happy];

        fn bit(self) -> u32 {
            self as u32
        }

        fn token(self) -> &'static str {
            match self {
                Mood::Calm => "calm",
                Mood::Angry => "angry",
                Mood::Sleepy => "sleepy",
                Mood::Happy => "happy",
            }
        }
    }

    fn set(flags: &[Mood]) -> FlagSet<Mood> {
        flags.iter().copied().collect()
    }

    #[test]
    fn test_encode_uses_table_order() {
        let a = set(&[Mood::Happy, Mood::Calm, Mood::Sleepy]);
        let b = set(&[Mood::Sleepy, Mood::Happy, Mood::Calm]);
        assert_eq!(a.encode(), vec!["calm", "sleepy", "happy"]);
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let a = set(&[Mood::Angry, Mood::Happy]);
        let decoded = FlagSet::<Mood>::decode(a.encode()).unwrap();
        assert_eq!(decoded, a);
    }

    #[test]
    fn test_decode_unknown_token() {
        let err = FlagSet::<Mood>::decode(["calm", "grumpy"]).unwrap_err();
        assert_eq!(err, FlagError::UnknownFlag(String::from("grumpy")));
    }

    #[test]
    fn test_set_reports_change() {
        let mut s = FlagSet::<Mood>::empty();
        assert!(s.set(Mood::Calm, true));
        assert!(!s.set(Mood::Calm, true));
        assert!(s.set(Mood::Calm, false));
        assert!(s.is_empty());
    }

    #[test]
    fn test_delta_add_and_remove() {
        let base = set(&[Mood::Calm, Mood::Sleepy]);
        let working = set(&[Mood::Sleepy, Mood::Happy]);
        let delta = working.delta(&base);
        assert_eq!(delta.add, set(&[Mood::Happy]));
        assert_eq!(delta.remove, set(&[Mood::Calm]));
    }

    #[test]
    fn test_delta_is_symmetric() {
        let a = set(&[Mood::Calm, Mood::Angry]);
        let b = set(&[Mood::Angry, Mood::Happy]);
        assert_eq!(a.delta(&b).add, b.delta(&a).remove);
        assert_eq!(a.delta(&b).remove, b.delta(&a).add);
    }

    #[test]
    fn test_plan_no_base_full_list() {
        let working = set(&[Mood::Angry]);
        assert_eq!(plan_flags(&working, None), FlagPatch::Full(working));
        assert_eq!(plan_flags(&FlagSet::<Mood>::empty(), None), FlagPatch::Unchanged);
    }

    #[test]
    fn test_plan_identical_is_unchanged() {
        let s = set(&[Mood::Calm, Mood::Happy]);
        assert_eq!(plan_flags(&s, Some(&s)), FlagPatch::Unchanged);
    }

    #[test]
    fn test_plan_wholesale_when_all_removed() {
        let base = set(&[Mood::Calm, Mood::Happy]);
        assert_eq!(plan_flags(&FlagSet::empty(), Some(&base)), FlagPatch::RemoveAll);
    }

    #[test]
    fn test_plan_partial_when_strict_subset_removed() {
        let base = set(&[Mood::Calm, Mood::Happy]);
        let working = set(&[Mood::Happy]);
        match plan_flags(&working, Some(&base)) {
            FlagPatch::Partial(delta) => {
                assert!(delta.add.is_empty());
                assert_eq!(delta.remove, set(&[Mood::Calm]));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_partial_when_base_replaced() {
        let base = set(&[Mood::Calm]);
        let working = set(&[Mood::Angry]);
        match plan_flags(&working, Some(&base)) {
            FlagPatch::Partial(delta) => {
                assert_eq!(delta.add, working);
                assert_eq!(delta.remove, base);
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn test_set_operators() {
        let a = set(&[Mood::Calm, Mood::Angry]);
        let b = set(&[Mood::Angry, Mood::Happy]);
        assert_eq!(a | b, set(&[Mood::Calm, Mood::Angry, Mood::Happy]));
        assert_eq!(a & b, set(&[Mood::Angry]));
        assert_eq!(a ^ b, set(&[Mood::Calm, Mood::Happy]));
        assert_eq!(a - b, set(&[Mood::Calm]));
        assert!((a | b).contains_all(a));
        assert_eq!((a | b).len(), 3);
    }

    #[test]
    fn test_debug_lists_tokens() {
        let s = set(&[Mood::Sleepy, Mood::Calm]);
        assert_eq!(format!("{s:?}"), r#"{"calm", "sleepy"}"#);
    }
}

//! Fleet records
//!
//! A fleet is a weighted list of ship variants plus the government,
//! naming, cargo and AI personality shared by every ship it spawns.
//!
//! ```text
//! fleet "Pirate Raid"
//! 	government Pirate
//! 	personality
//! 		confusion 20
//! 		add heroic
//! 	add variant 2
//! 		Falcon
//! 		Bounder 3
//! ```
//!
//! Author: Moroya Sakamoto

use std::collections::BTreeSet;

use crate::directive::{Directive, Line};
use crate::emit::Record;
use crate::field::{self, SetStyle};
use crate::flags::{plan_flags, Flag, FlagPatch, FlagSet};
use crate::registry::{Definitions, Government, Handle, Outfitter, Phrase, ShipModel};
use crate::runlength::{encode_runs, plan_list, run_at};

/// Cargo loads when a fleet does not say otherwise.
pub const DEFAULT_CARGO: i32 = 3;
/// Confusion multiplier when a fleet does not say otherwise.
pub const DEFAULT_CONFUSION: f64 = 10.0;
/// Relative spawn weight of a variant.
pub const DEFAULT_WEIGHT: i32 = 1;

// ── Personality ────────────────────────────────────────────────────────

macro_rules! personality_traits {
    ($($variant:ident => $token:literal),* $(,)?) => {
        /// AI behavior trait. Declaration order is the bit order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PersonalityTrait {
            $($variant),*
        }

        impl Flag for PersonalityTrait {
            const ALL: &'static [Self] = &[$(PersonalityTrait::$variant),*];

            fn bit(self) -> u32 {
                self as u32
            }

            fn token(self) -> &'static str {
                match self {
                    $(PersonalityTrait::$variant => $token),*
                }
            }
        }
    };
}

personality_traits! {
    Pacifist => "pacifist",
    Forbearing => "forbearing",
    Timid => "timid",
    Disables => "disables",
    Plunders => "plunders",
    Heroic => "heroic",
    Staying => "staying",
    Entering => "entering",
    Nemesis => "nemesis",
    Surveillance => "surveillance",
    Uninterested => "uninterested",
    Waiting => "waiting",
    Derelict => "derelict",
    Fleeing => "fleeing",
    Escort => "escort",
    Frugal => "frugal",
    Coward => "coward",
    Vindictive => "vindictive",
    Swarming => "swarming",
    Unconstrained => "unconstrained",
    Mining => "mining",
    Harvests => "harvests",
    Appeasing => "appeasing",
    Mute => "mute",
    Opportunistic => "opportunistic",
    Target => "target",
    Marked => "marked",
    Launching => "launching",
}

/// Confusion plus the trait bit set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    pub confusion: f64,
    pub traits: FlagSet<PersonalityTrait>,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            confusion: DEFAULT_CONFUSION,
            traits: FlagSet::empty(),
        }
    }
}

// ── Variant ────────────────────────────────────────────────────────────

/// One spawnable composition. Ships are stored expanded; repeated
/// consecutive ships are collapsed only when written.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub weight: i32,
    pub ships: Vec<Handle<ShipModel>>,
}

impl Default for Variant {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT)
    }
}

impl Variant {
    pub fn new(weight: i32) -> Self {
        Self {
            weight,
            ships: Vec::new(),
        }
    }

    /// Variant holding `ships` in order.
    pub fn with_ships(weight: i32, ships: Vec<Handle<ShipModel>>) -> Self {
        Self { weight, ships }
    }

    pub fn add_ship(&mut self, ship: Handle<ShipModel>) {
        self.ships.push(ship);
    }

    /// Item range `start..end` of the run containing ship `index`.
    fn run_range(&self, index: usize) -> Option<(usize, usize)> {
        let (_, start) = run_at(&self.ships, index)?;
        let value = self.ships[start];
        let len = self.ships[start..].iter().take_while(|&&s| s == value).count();
        Some((start, start + len))
    }

    /// Grow or shrink the run containing ship `index` to `count` ships.
    /// A count of 0 drops the run. Returns false if `index` is out of range.
    pub fn set_run_count(&mut self, index: usize, count: usize) -> bool {
        let Some((start, end)) = self.run_range(index) else {
            return false;
        };
        let ship = self.ships[start];
        let tail = self.ships.split_off(end);
        self.ships.truncate(start);
        self.ships.extend(core::iter::repeat(ship).take(count));
        self.ships.extend(tail);
        true
    }

    /// Swap every ship in the run containing `index` for `ship`.
    pub fn replace_run(&mut self, index: usize, ship: Handle<ShipModel>) -> bool {
        let Some((start, end)) = self.run_range(index) else {
            return false;
        };
        self.ships[start..end].fill(ship);
        true
    }

    fn to_line(&self, defs: &Definitions) -> Line {
        let mut line = Line::new("variant");
        if self.weight != DEFAULT_WEIGHT {
            line = line.arg(self.weight);
        }
        let children = encode_runs(&self.ships)
            .into_iter()
            .filter_map(|run| {
                let name = defs.ships.resolve(Some(run.value))?;
                let ship = Line::new(name);
                Some(Directive::overwrite(if run.count > 1 {
                    ship.arg(run.count)
                } else {
                    ship
                }))
            })
            .collect();
        line.with_children(children)
    }
}

// ── Fleet ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    pub name: String,
    pub government: Option<Handle<Government>>,
    pub names: Option<Handle<Phrase>>,
    pub fighters: Option<Handle<Phrase>>,
    pub cargo: i32,
    pub commodities: BTreeSet<String>,
    pub outfitters: BTreeSet<Handle<Outfitter>>,
    pub personality: Personality,
    pub variants: Vec<Variant>,
}

impl Fleet {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            government: None,
            names: None,
            fighters: None,
            cargo: DEFAULT_CARGO,
            commodities: BTreeSet::new(),
            outfitters: BTreeSet::new(),
            personality: Personality::default(),
            variants: Vec::new(),
        }
    }

    pub fn add_variant(&mut self, variant: Variant) -> usize {
        self.variants.push(variant);
        self.variants.len() - 1
    }

    pub fn remove_variant(&mut self, index: usize) -> Option<Variant> {
        (index < self.variants.len()).then(|| self.variants.remove(index))
    }

    /// Total spawn weight across variants, saturating at `i32::MAX`.
    pub fn total_weight(&self) -> i32 {
        self.variants
            .iter()
            .fold(0i32, |total, v| total.saturating_add(v.weight))
    }

    fn personality_directives(&self, base: Option<&Personality>) -> Vec<Directive> {
        let working = &self.personality;
        if base == Some(working) {
            return Vec::new();
        }
        let plan = plan_flags(&working.traits, base.map(|b| &b.traits));
        let mut out = Vec::new();
        let mut body = Vec::new();

        let confusion_base = match plan {
            // Clearing the group resets confusion to its default.
            FlagPatch::RemoveAll => {
                out.push(Directive::remove_all("personality"));
                None
            }
            _ => base.map(|b| &b.confusion),
        };
        if let Some(d) = field::scalar(
            &working.confusion,
            confusion_base,
            &DEFAULT_CONFUSION,
            field::number_line("confusion"),
        ) {
            body.push(d);
        }
        body.extend(field::flag_lines(&plan));

        if !body.is_empty() {
            out.push(Directive::overwrite(
                Line::new("personality").with_children(body),
            ));
        }
        out
    }
}

impl Record for Fleet {
    const KIND: &'static str = "fleet";

    fn named(name: &str) -> Self {
        Self::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = String::from(name);
    }

    fn directives(&self, base: Option<&Self>, defs: &Definitions) -> Vec<Directive> {
        let mut out = Vec::new();

        out.extend(field::reference(
            "government",
            self.government,
            base.map(|b| b.government),
            &defs.governments,
        ));
        out.extend(field::reference(
            "names",
            self.names,
            base.map(|b| b.names),
            &defs.phrases,
        ));
        out.extend(field::reference(
            "fighters",
            self.fighters,
            base.map(|b| b.fighters),
            &defs.phrases,
        ));
        out.extend(field::scalar(
            &self.cargo,
            base.map(|b| &b.cargo),
            &DEFAULT_CARGO,
            |v| Line::new("cargo").arg(*v),
        ));
        out.extend(field::set(
            "commodities",
            &self.commodities,
            base.map(|b| &b.commodities),
            SetStyle::Inline,
        ));
        out.extend(field::reference_set(
            "outfitters",
            &self.outfitters,
            base.map(|b| &b.outfitters),
            &defs.outfitters,
            SetStyle::Inline,
        ));
        out.extend(self.personality_directives(base.map(|b| &b.personality)));

        if base.map_or(true, |b| b.variants != self.variants) {
            let plan = plan_list(&self.variants, base.map(|b| b.variants.as_slice()));
            out.extend(field::list("variant", plan, |v| Some(v.to_line(defs))));
        }
        out
    }
}

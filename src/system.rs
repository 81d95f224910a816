//! Star system records
//!
//! Systems carry scalar map data, link and attribute sets, several
//! spawn lists, a trade price table, and a tree of stellar objects
//! (stars, planets, moons) stored as an [`IndexedTree`].
//!
//! Author: Moroya Sakamoto

use std::collections::{BTreeMap, BTreeSet};

use crate::directive::{Directive, Line};
use crate::emit::Record;
use crate::field::{self, SetStyle};
use crate::registry::{Definitions, Government, Handle, Hazard, Minable, Planet, Sprite};
use crate::runlength::plan_list;
use crate::tree::IndexedTree;
use crate::writer::Token;

pub const DEFAULT_HABITABLE: f64 = 1000.0;
pub const DEFAULT_BELT: f64 = 1500.0;
pub const DEFAULT_JUMP_RANGE: f64 = 0.0;

/// Attribute the game derives on its own; never written.
const DERIVED_ATTRIBUTE: &str = "uninhabited";

/// Map offset of a cloned system from its source, on both axes.
const CLONE_OFFSET: f64 = 25.0;

// ── Components ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Decorative asteroid field.
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub name: String,
    pub count: i32,
    pub energy: f64,
}

/// Mineable asteroid field.
#[derive(Debug, Clone, PartialEq)]
pub struct MinableBelt {
    pub minable: Handle<Minable>,
    pub count: i32,
    pub energy: f64,
}

/// Fleet spawned on average every `period` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomFleet {
    pub fleet: String,
    pub period: i32,
}

/// Hazard triggered on average every `period` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomHazard {
    pub hazard: Handle<Hazard>,
    pub period: i32,
}

/// Extra arrival distance for hyperspace links and jump drives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Arrival {
    pub link: f64,
    pub jump: f64,
}

/// Star, planet, moon or station in a system's object tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StellarObject {
    pub planet: Option<Handle<Planet>>,
    pub sprite: Option<Handle<Sprite>>,
    pub distance: f64,
    pub period: f64,
    pub offset: f64,
}

impl StellarObject {
    /// Object line with its own attributes as children. Nested objects
    /// are appended by the caller.
    fn to_line(&self, defs: &Definitions) -> Line {
        let mut line = Line::new("object");
        if let Some(planet) = defs.planets.resolve(self.planet) {
            line = line.arg(planet);
        }
        let mut children = Vec::new();
        if let Some(sprite) = defs.sprites.resolve(self.sprite) {
            children.push(Directive::overwrite(Line::new("sprite").arg(sprite)));
        }
        for (key, value) in [
            ("distance", self.distance),
            ("period", self.period),
            ("offset", self.offset),
        ] {
            if value != 0.0 {
                children.push(Directive::overwrite(Line::new(key).arg(value)));
            }
        }
        line.with_children(children)
    }
}

// ── System ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub name: String,
    pub position: Option<Point>,
    pub government: Option<Handle<Government>>,
    pub music: String,
    pub links: BTreeSet<String>,
    pub hidden: bool,
    pub asteroids: Vec<Asteroid>,
    pub minables: Vec<MinableBelt>,
    pub haze: Option<Handle<Sprite>>,
    pub fleets: Vec<RandomFleet>,
    pub hazards: Vec<RandomHazard>,
    pub habitable: f64,
    pub belt: f64,
    pub jump_range: f64,
    pub arrival: Arrival,
    pub trade: BTreeMap<String, i32>,
    pub attributes: BTreeSet<String>,
    pub objects: IndexedTree<StellarObject>,
}

impl System {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            position: None,
            government: None,
            music: String::new(),
            links: BTreeSet::new(),
            hidden: false,
            asteroids: Vec::new(),
            minables: Vec::new(),
            haze: None,
            fleets: Vec::new(),
            hazards: Vec::new(),
            habitable: DEFAULT_HABITABLE,
            belt: DEFAULT_BELT,
            jump_range: DEFAULT_JUMP_RANGE,
            arrival: Arrival::default(),
            trade: BTreeMap::new(),
            attributes: BTreeSet::new(),
            objects: IndexedTree::new(),
        }
    }

    /// Add a top-level object (usually a star).
    pub fn add_object(&mut self, object: StellarObject) -> usize {
        self.objects.push_root(object)
    }

    /// Add `object` orbiting `parent`, after the parent's existing
    /// satellites.
    pub fn add_child_object(&mut self, parent: usize, object: StellarObject) -> Option<usize> {
        self.objects.insert_child(parent, object)
    }

    /// Remove an object and everything orbiting it.
    pub fn remove_object(&mut self, index: usize) -> Vec<StellarObject> {
        self.objects.remove(index)
    }

    fn attributes_written(&self) -> BTreeSet<String> {
        self.attributes
            .iter()
            .filter(|a| a.as_str() != DERIVED_ATTRIBUTE)
            .cloned()
            .collect()
    }

    fn position_directive(&self, base: Option<&Self>) -> Option<Directive> {
        let base_position = base.map(|b| b.position);
        if base_position == Some(self.position) {
            return None;
        }
        match self.position {
            Some(pos) => Some(Directive::overwrite(Line::new("pos").arg(pos.x).arg(pos.y))),
            // Only a base that had a position can lose it.
            None => base_position.flatten().map(|_| Directive::remove_all("pos")),
        }
    }

    fn arrival_directive(&self, base: Option<&Self>) -> Option<Directive> {
        let arrival = self.arrival;
        let base_arrival = base.map(|b| b.arrival);
        if base_arrival == Some(arrival) {
            return None;
        }
        if arrival.link == arrival.jump {
            // A single value covers both; skip the no-base default.
            return (base.is_some() || arrival.link != 0.0)
                .then(|| Directive::overwrite(Line::new("arrival").arg(arrival.link)));
        }
        let reference = base_arrival.unwrap_or_default();
        let mut children = Vec::new();
        if arrival.link != reference.link {
            children.push(Directive::overwrite(Line::new("link").arg(arrival.link)));
        }
        if arrival.jump != reference.jump {
            children.push(Directive::overwrite(Line::new("jump").arg(arrival.jump)));
        }
        Some(Directive::overwrite(
            Line::new("arrival").with_children(children),
        ))
    }

    fn object_directives(&self, base: Option<&Self>, defs: &Definitions) -> Vec<Directive> {
        let working = &self.objects;
        let Some(base) = base.map(|b| &b.objects) else {
            return nest_objects(working, 0, false, defs);
        };
        if working == base {
            return Vec::new();
        }
        if working.is_empty() {
            return vec![Directive::remove_all("object")];
        }
        let split = base.len();
        let appended_only = working.len() > split
            && working.nodes()[..split] == *base.nodes()
            && working.nodes()[split..]
                .iter()
                .all(|n| n.parent.map_or(true, |p| p >= split));
        if appended_only {
            nest_objects(working, split, true, defs)
        } else {
            nest_objects(working, 0, false, defs)
        }
    }
}

/// Object lines for `tree[from..]`, each nested under its parent's line.
/// Nesting depth comes from walking the parent chain of every node.
fn nest_objects(
    tree: &IndexedTree<StellarObject>,
    from: usize,
    add_roots: bool,
    defs: &Definitions,
) -> Vec<Directive> {
    let mut out = Vec::new();
    let mut open: Vec<(usize, Line)> = Vec::new();

    let close = |open: &mut Vec<(usize, Line)>, out: &mut Vec<Directive>| {
        let Some((_, line)) = open.pop() else {
            return;
        };
        match open.last_mut() {
            Some((_, parent)) => parent.children.push(Directive::overwrite(line)),
            None if add_roots => out.push(Directive::add(line)),
            None => out.push(Directive::overwrite(line)),
        }
    };

    for (_, depth, object) in tree.iter().skip(from) {
        while open.last().is_some_and(|(d, _)| *d >= depth) {
            close(&mut open, &mut out);
        }
        open.push((depth, object.to_line(defs)));
    }
    while !open.is_empty() {
        close(&mut open, &mut out);
    }
    out
}

impl Record for System {
    const KIND: &'static str = "system";

    fn named(name: &str) -> Self {
        Self::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = String::from(name);
    }

    /// The copy sits next to the source on the map with no links and no
    /// stellar objects, and is marked uninhabited.
    fn cloned_as(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.name = String::from(name);
        copy.position = self
            .position
            .map(|p| Point::new(p.x + CLONE_OFFSET, p.y + CLONE_OFFSET));
        copy.links.clear();
        copy.objects = IndexedTree::new();
        copy.attributes.insert(String::from(DERIVED_ATTRIBUTE));
        copy
    }

    fn directives(&self, base: Option<&Self>, defs: &Definitions) -> Vec<Directive> {
        let mut out = Vec::new();

        out.extend(self.position_directive(base));
        out.extend(field::reference(
            "government",
            self.government,
            base.map(|b| b.government),
            &defs.governments,
        ));
        out.extend(field::text(
            "music",
            &self.music,
            base.map(|b| b.music.as_str()),
        ));
        out.extend(field::set(
            "link",
            &self.links,
            base.map(|b| &b.links),
            SetStyle::PerItem,
        ));
        out.extend(field::presence("hidden", self.hidden, base.map(|b| b.hidden)));

        if base.map_or(true, |b| b.asteroids != self.asteroids) {
            let plan = plan_list(&self.asteroids, base.map(|b| b.asteroids.as_slice()));
            out.extend(field::list("asteroids", plan, |a| {
                Some(Line::new("asteroids").arg(&a.name).arg(a.count).arg(a.energy))
            }));
        }
        if base.map_or(true, |b| b.minables != self.minables) {
            let plan = plan_list(&self.minables, base.map(|b| b.minables.as_slice()));
            out.extend(field::list("minables", plan, |m| {
                defs.minables
                    .resolve(Some(m.minable))
                    .map(|name| Line::new("minables").arg(name).arg(m.count).arg(m.energy))
            }));
        }

        out.extend(field::reference(
            "haze",
            self.haze,
            base.map(|b| b.haze),
            &defs.sprites,
        ));

        if base.map_or(true, |b| b.fleets != self.fleets) {
            let plan = plan_list(&self.fleets, base.map(|b| b.fleets.as_slice()));
            out.extend(field::list("fleet", plan, |f| {
                Some(Line::new("fleet").arg(&f.fleet).arg(f.period))
            }));
        }
        if base.map_or(true, |b| b.hazards != self.hazards) {
            let plan = plan_list(&self.hazards, base.map(|b| b.hazards.as_slice()));
            out.extend(field::list("hazard", plan, |h| {
                defs.hazards
                    .resolve(Some(h.hazard))
                    .map(|name| Line::new("hazard").arg(name).arg(h.period))
            }));
        }

        out.extend(field::scalar(
            &self.habitable,
            base.map(|b| &b.habitable),
            &DEFAULT_HABITABLE,
            field::number_line("habitable"),
        ));
        out.extend(field::scalar(
            &self.belt,
            base.map(|b| &b.belt),
            &DEFAULT_BELT,
            field::number_line("belt"),
        ));
        out.extend(field::scalar(
            &self.jump_range,
            base.map(|b| &b.jump_range),
            &DEFAULT_JUMP_RANGE,
            |v| Line::new("jump range").arg(Token::Float(*v)),
        ));
        out.extend(self.arrival_directive(base));
        out.extend(field::keyed_map("trade", &self.trade, base.map(|b| &b.trade)));

        let attributes = self.attributes_written();
        let base_attributes = base.map(System::attributes_written);
        out.extend(field::set(
            "attributes",
            &attributes,
            base_attributes.as_ref(),
            SetStyle::Inline,
        ));

        out.extend(self.object_directives(base, defs));
        out
    }
}

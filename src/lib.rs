//! plugin-diff — Minimal patches for edited game data
//!
//! Don't rewrite the record, write what changed.
//!
//! Compares an edited ("working") record against its original ("base")
//! definition and emits the smallest set of directives that rebuilds the
//! working record when the game's data loader applies them on top of the
//! base:
//! - Scalar overrides, reference fields compared by identity
//! - Set-valued fields as `add` / `remove` lines
//! - Bit-flag groups with a wholesale `remove` when cleared
//! - Run-length encoded repeated list items with multiset deltas
//! - Parent-indexed object trees written as nested blocks
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Writer layout options (serde) |
//! | [`directive`] | Directive and patch types |
//! | [`emit`] | `Record` trait and the diff emitter |
//! | [`error`] | Error types |
//! | [`field`] | Per-field diff primitives (scalars, sets, maps, lists) |
//! | [`flags`] | Flag-set codec and flag deltas |
//! | [`fleet`] | Fleet records and variant editing |
//! | [`registry`] | Interned definitions referenced by handle |
//! | [`runlength`] | Run-length list codec and multiset deltas |
//! | [`session`] | Dirty tracking, reset, and save |
//! | [`store`] | Base and working record store |
//! | [`system`] | Star system records and their object tree |
//! | [`tree`] | Parent-indexed pre-order tree |
//! | [`writer`] | Indentation-scoped token writer |
//!
//! # Quick Start
//!
//! ```
//! use plugin_diff::{Catalog, Definitions, Fleet, Session, DataWriter};
//!
//! let mut defs = Definitions::new();
//! let pirate = defs.governments.intern("Pirate");
//!
//! // Load a base fleet, then edit it
//! let mut catalog = Catalog::new();
//! let mut raid = Fleet::new("Raid");
//! raid.government = Some(pirate);
//! catalog.insert_base(raid);
//!
//! let mut session = Session::new(catalog);
//! session.edit("Raid").unwrap().cargo = 0;
//!
//! // Only the changed field is written
//! let mut writer = DataWriter::buffer();
//! session.save(&defs, &mut writer).unwrap();
//! assert_eq!(writer.contents(), "fleet Raid\n\tcargo 0\n");
//! ```
//!
//! Author: Moroya Sakamoto

pub mod config;
pub mod directive;
pub mod emit;
pub mod error;
pub mod field;
pub mod flags;
pub mod fleet;
pub mod registry;
pub mod runlength;
pub mod session;
pub mod store;
pub mod system;
pub mod tree;
pub mod writer;

pub use config::WriterConfig;
pub use directive::{Directive, Line, Patch, PatchMode};
pub use emit::{DiffEmitter, Record};
pub use error::{EditorError, FlagError, TreeError, WriteError};
pub use flags::{plan_flags, Flag, FlagDelta, FlagPatch, FlagSet};
pub use fleet::{Fleet, Personality, PersonalityTrait, Variant};
pub use registry::{Definitions, Handle, Kind, Registry};
pub use runlength::{decode_runs, encode_runs, list_delta, plan_list, ListDelta, ListPatch, Run};
pub use session::Session;
pub use store::{Catalog, RecordStore};
pub use system::{Arrival, Asteroid, MinableBelt, Point, RandomFleet, RandomHazard, StellarObject, System};
pub use tree::{IndexedTree, TreeNode};
pub use writer::{DataWriter, Token, TokenWriter};

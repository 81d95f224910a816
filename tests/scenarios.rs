//! End-to-end patch scenarios: edit records in a session, save, and check
//! the exact text handed to the data loader.

use plugin_diff::fleet::PersonalityTrait::{Heroic, Pacifist, Timid};
use plugin_diff::{
    list_delta, Catalog, DataWriter, Definitions, DiffEmitter, Directive, Fleet, IndexedTree,
    PatchMode, Point, Session, StellarObject, System, TreeNode, Variant, WriterConfig,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn personality_add_and_remove() {
    let defs = Definitions::new();
    let mut base = Fleet::new("Raid");
    base.personality.traits = [Pacifist, Timid].into_iter().collect();
    let mut working = base.clone();
    working.personality.traits = [Timid, Heroic].into_iter().collect();

    let patch = DiffEmitter::new(&defs).patch(&working, Some(&base));
    assert_eq!(
        patch.to_text().unwrap(),
        "fleet Raid\n\tpersonality\n\t\tadd heroic\n\t\tremove pacifist\n"
    );
}

#[test]
fn run_length_list_delta() {
    let delta = list_delta(&['A', 'A', 'B', 'B', 'B'], &['A', 'A', 'A', 'B']);
    assert_eq!(delta.remove, vec!['A']);
    assert_eq!(delta.add, vec!['B', 'B']);
}

#[test]
fn tree_remove_keeps_parent() {
    let mut tree = IndexedTree::from_nodes(vec![
        TreeNode::root("root"),
        TreeNode::child_of(0, "a"),
        TreeNode::child_of(0, "b"),
    ])
    .unwrap();
    tree.remove(1);
    assert_eq!(
        tree.nodes(),
        &[TreeNode::root("root"), TreeNode::child_of(0, "b")][..]
    );
}

#[test]
fn new_fleet_written_in_full() {
    init_tracing();
    let mut defs = Definitions::new();
    let falcon = defs.ships.intern("Falcon");
    let bounder = defs.ships.intern("Bounder");
    let mut session: Session<Fleet> = Session::default();
    {
        let fleet = session.create("Pirate Raid").unwrap();
        fleet.government = Some(defs.governments.intern("Pirate"));
        fleet.names = Some(defs.phrases.intern("pirate names"));
        fleet.cargo = 1;
        fleet.commodities.insert(String::from("Luxury Goods"));
        fleet.commodities.insert(String::from("Metal"));
        fleet.outfitters.insert(defs.outfitters.intern("Pirate Outfits"));
        fleet.personality.traits = [Heroic, Pacifist].into_iter().collect();
        fleet.personality.confusion = 20.0;
        fleet.add_variant(Variant::with_ships(2, vec![falcon, bounder, bounder, bounder]));
        fleet.add_variant(Variant::with_ships(1, vec![bounder]));
    }
    let mut writer = DataWriter::buffer();
    assert_eq!(session.save(&defs, &mut writer).unwrap(), 1);
    assert_eq!(
        writer.contents(),
        "fleet \"Pirate Raid\"\n\
         \tgovernment Pirate\n\
         \tnames \"pirate names\"\n\
         \tcargo 1\n\
         \tcommodities \"Luxury Goods\" Metal\n\
         \toutfitters \"Pirate Outfits\"\n\
         \tpersonality\n\
         \t\tconfusion 20\n\
         \t\tpacifist heroic\n\
         \tvariant 2\n\
         \t\tFalcon\n\
         \t\tBounder 3\n\
         \tvariant\n\
         \t\tBounder\n"
    );
}

#[test]
fn edited_fleet_writes_only_changes() {
    init_tracing();
    let mut defs = Definitions::new();
    let falcon = defs.ships.intern("Falcon");
    let bounder = defs.ships.intern("Bounder");
    let pirate = defs.governments.intern("Pirate");

    let mut base = Fleet::new("Raid");
    base.government = Some(pirate);
    base.add_variant(Variant::with_ships(1, vec![falcon, falcon, falcon, bounder]));
    base.add_variant(Variant::with_ships(3, vec![bounder]));
    let mut catalog = Catalog::new();
    catalog.insert_base(base);
    let mut session = Session::new(catalog);

    {
        let fleet = session.edit("Raid").unwrap();
        fleet.government = None;
        // Grow the bounder run of the first variant from 1 to 3.
        fleet.variants[0].set_run_count(3, 3);
    }
    let mut writer = DataWriter::buffer();
    session.save(&defs, &mut writer).unwrap();
    assert_eq!(
        writer.contents(),
        "fleet Raid\n\
         \tremove government\n\
         \tadd variant\n\
         \t\tFalcon 3\n\
         \t\tBounder 3\n\
         \tremove variant\n\
         \t\tFalcon 3\n\
         \t\tBounder\n"
    );
    assert!(!session.is_dirty("Raid"));
}

#[test]
fn unchanged_base_record_writes_nothing() {
    let defs = Definitions::new();
    let mut catalog = Catalog::new();
    catalog.insert_base(Fleet::new("Raid"));
    let mut session = Session::new(catalog);
    session.mark_dirty("Raid");
    let mut writer = DataWriter::buffer();
    assert_eq!(session.save(&defs, &mut writer).unwrap(), 0);
    assert_eq!(writer.contents(), "");
}

fn sol(defs: &mut Definitions) -> System {
    let mut sol = System::new("Sol");
    sol.position = Some(Point::new(0.0, 0.0));
    sol.government = Some(defs.governments.intern("Republic"));
    sol.links.insert(String::from("Alpha Centauri"));
    sol.trade.insert(String::from("Food"), 150);
    let sun = sol.add_object(StellarObject {
        sprite: Some(defs.sprites.intern("star/g0")),
        ..StellarObject::default()
    });
    sol.add_child_object(
        sun,
        StellarObject {
            planet: Some(defs.planets.intern("Earth")),
            sprite: Some(defs.sprites.intern("planet/earth")),
            distance: 480.0,
            period: 365.25,
            offset: 0.0,
        },
    );
    sol
}

#[test]
fn system_appended_station() {
    init_tracing();
    let mut defs = Definitions::new();
    let base = sol(&mut defs);
    let mut catalog = Catalog::new();
    catalog.insert_base(base);
    let mut session = Session::new(catalog);

    let station = StellarObject {
        planet: Some(defs.planets.intern("Deep Station")),
        distance: 2000.0,
        period: 3000.0,
        ..StellarObject::default()
    };
    {
        let sol = session.edit("Sol").unwrap();
        sol.links.insert(String::from("Sirius"));
        sol.trade.insert(String::from("Food"), 120);
        sol.attributes.insert(String::from("core"));
        sol.add_object(station);
    }
    let mut writer = DataWriter::buffer();
    session.save(&defs, &mut writer).unwrap();
    assert_eq!(
        writer.contents(),
        "system Sol\n\
         \tadd link Sirius\n\
         \ttrade Food 120\n\
         \tadd attributes core\n\
         \tadd object \"Deep Station\"\n\
         \t\tdistance 2000\n\
         \t\tperiod 3000\n"
    );
}

#[test]
fn system_emptied_objects() {
    let mut defs = Definitions::new();
    let base = sol(&mut defs);
    let mut working = base.clone();
    working.remove_object(0);
    assert!(working.objects.is_empty());
    let patch = DiffEmitter::new(&defs).patch(&working, Some(&base));
    assert_eq!(patch.mode, PatchMode::Diff);
    assert_eq!(patch.directives, vec![Directive::remove_all("object")]);
}

#[test]
fn new_system_full_with_spaces_indent() {
    let mut defs = Definitions::new();
    let system = sol(&mut defs);
    let patch = DiffEmitter::new(&defs).patch(&system, None);
    assert_eq!(patch.mode, PatchMode::Full);
    assert!(patch
        .directives
        .iter()
        .all(|d| matches!(d, Directive::Overwrite(_))));

    let config = WriterConfig::default().with_indent("  ");
    let mut writer = DataWriter::with_config(Vec::new(), config);
    patch.write_to(&mut writer).unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(
        text,
        "system Sol\n\
         \x20 pos 0 0\n\
         \x20 government Republic\n\
         \x20 link \"Alpha Centauri\"\n\
         \x20 trade Food 150\n\
         \x20 object\n\
         \x20   sprite star/g0\n\
         \x20   object Earth\n\
         \x20     sprite planet/earth\n\
         \x20     distance 480\n\
         \x20     period 365.25\n"
    );
}

#[test]
fn dangling_reference_is_treated_as_absent() {
    init_tracing();
    let mut defs = Definitions::new();
    let mut fleet = Fleet::new("Ghosts");
    fleet.government = Some(defs.governments.intern("Old Empire"));
    defs.clear();
    let patch = DiffEmitter::new(&defs).patch(&fleet, None);
    assert!(patch.is_empty());
    assert_eq!(patch.to_text().unwrap(), "fleet Ghosts\n");
}

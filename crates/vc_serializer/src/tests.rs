//! End-to-end save and load scenarios.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::{Value as JsonValue, json};
use vc_object::{ClassHooks, SpawnParams, World};
use vc_reflect::info::{ClassFlags, ClassInfo, StructInfo};
use vc_reflect::{DynamicStruct, FieldType, NamedField, ObjectId, TypeHandle, TypeRegistry, Value, builtin};

use crate::{
    DeserializeError, ExtendDataContainer, ExtendDataFactory, ExtendDataRegistry, GraphDeserializer, GraphSerializer,
    NotifyReplay, Phase, SaveDocument, SerializeConfig, SerializeError,
};

// -----------------------------------------------------------------------------
// Fixture

struct Types {
    registry: Arc<TypeRegistry>,
    pawn: TypeHandle,
    item: TypeHandle,
    point: TypeHandle,
    spawn_point: TypeHandle,
}

fn types() -> Types {
    let mut registry = TypeRegistry::new();
    let point = registry
        .register_struct(StructInfo::new("game.Point").with_field(NamedField::new("X", FieldType::Int)))
        .unwrap();
    let item = registry
        .register_class(
            ClassInfo::new("game.Item", Some(builtin::OBJECT))
                .with_field(NamedField::new("Count", FieldType::Int).with_default(Value::Int(1))),
        )
        .unwrap();
    let pawn = registry
        .register_class(
            ClassInfo::new("game.Pawn", Some(builtin::ACTOR))
                .with_flags(ClassFlags::SAVE_GAME)
                .with_field(
                    NamedField::new("Health", FieldType::Int)
                        .with_default(Value::Int(100))
                        .with_notify("OnRep_Vitals"),
                )
                .with_field(NamedField::new("Armor", FieldType::Int).with_notify("OnRep_Vitals"))
                .with_field(NamedField::new("Big", FieldType::Int))
                .with_field(NamedField::new("Friend", FieldType::Object(builtin::ACTOR)))
                .with_field(NamedField::new("Weapon", FieldType::Object(item)))
                .with_field(NamedField::new("Refs", FieldType::array(FieldType::Object(builtin::OBJECT))))
                .with_field(NamedField::new("Spots", FieldType::map(FieldType::Struct(point), FieldType::Int)))
                .with_field(NamedField::new("Kind", FieldType::Class(builtin::OBJECT))),
        )
        .unwrap();
    let spawn_point = registry
        .register_struct(
            StructInfo::new("game.SpawnPoint")
                .with_field(NamedField::new("Tint", FieldType::Struct(builtin::COLOR)))
                .with_field(NamedField::new("Anchor", FieldType::Object(builtin::ACTOR))),
        )
        .unwrap();

    Types {
        registry: Arc::new(registry),
        pawn,
        item,
        point,
        spawn_point,
    }
}

fn new_world(types: &Types) -> (World, ObjectId) {
    let mut world = World::new(Arc::clone(&types.registry));
    let level = world.create_level("Arena").unwrap();
    (world, level)
}

fn spawn(world: &mut World, types: &Types, level: ObjectId, name: &str) -> ObjectId {
    world.spawn_actor(types.pawn, level, SpawnParams::named(name)).unwrap()
}

fn save(world: &World, extend: &ExtendDataRegistry, roots: &[Option<ObjectId>]) -> SaveDocument {
    let mut ser = GraphSerializer::new(world, extend);
    ser.add_objects("Actors", roots).unwrap();
    ser.finish()
}

fn load<'d>(
    document: &'d SaveDocument,
    extend: &'d ExtendDataRegistry,
    world: &mut World,
    level: ObjectId,
) -> GraphDeserializer<'d> {
    let mut de = GraphDeserializer::new(document, level, extend);
    de.load_all(world).unwrap();
    de
}

fn record<'j>(json: &'j JsonValue, idx: &str) -> &'j JsonValue {
    &json["__DynamicObjects"][idx]
}

// -----------------------------------------------------------------------------
// Scenarios

#[test]
fn round_trip() {
    let types = types();
    let extend = ExtendDataRegistry::new();

    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");
    let sword = world.new_object(types.item, hero, Some("Sword")).unwrap();
    world.set_field(sword, "Count", Value::Int(3)).unwrap();
    world.set_field(hero, "Health", Value::Int(50)).unwrap();
    world.set_field(hero, "Weapon", Value::Object(Some(sword))).unwrap();
    world.set_field(hero, "Kind", Value::Class(Some(types.item))).unwrap();

    let document = save(&world, &extend, &[Some(hero)]);
    let text = document.to_json_string().unwrap();
    let document = SaveDocument::from_json_str(&text).unwrap();

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    assert_eq!(de.phase(), Phase::Finished);

    let [Some(hero)] = de.objects("Actors").unwrap()[..] else {
        panic!("hero was not loaded");
    };
    assert_eq!(target.path_of(hero).as_deref(), Some("/Arena/Hero"));
    assert_eq!(target.field(hero, "Health"), Some(&Value::Int(50)));
    assert_eq!(target.field(hero, "Kind"), Some(&Value::Class(Some(types.item))));

    let Some(&Value::Object(Some(sword))) = target.field(hero, "Weapon") else {
        panic!("weapon was not restored");
    };
    assert_eq!(target.path_of(sword).as_deref(), Some("/Arena/Hero/Sword"));
    assert_eq!(target.field(sword, "Count"), Some(&Value::Int(3)));
    assert_eq!(de.spawned_actors(), [hero]);
    assert_eq!(de.instanced_objects().count(), 2);
}

#[test]
fn unchanged_object_writes_no_fields() {
    let types = types();
    let extend = ExtendDataRegistry::with_defaults();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");

    let json = save(&world, &extend, &[Some(hero)]).into_json();
    assert_eq!(record(&json, "1"), &json!({ "__Name": "Hero", "__Class": -1 }));
    assert_eq!(json["__ExternalObjects"], json!({ "-1": "game.Pawn" }));
}

#[test]
fn cyclic_references() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let a = spawn(&mut world, &types, level, "A");
    let b = spawn(&mut world, &types, level, "B");
    world.set_field(a, "Friend", Value::Object(Some(b))).unwrap();
    world.set_field(b, "Friend", Value::Object(Some(a))).unwrap();

    let document = save(&world, &extend, &[Some(a), Some(b)]);
    let json = document.clone().into_json();
    assert_eq!(json["Actors"], json!([1, 2]));
    assert_eq!(record(&json, "1")["Friend"], json!(2));
    assert_eq!(record(&json, "2")["Friend"], json!(1));

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let (a, b) = (de.object_by_idx(1).unwrap(), de.object_by_idx(2).unwrap());
    assert_eq!(target.field(a, "Friend"), Some(&Value::Object(Some(b))));
    assert_eq!(target.field(b, "Friend"), Some(&Value::Object(Some(a))));
}

#[test]
fn owned_object_is_nested() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let a = spawn(&mut world, &types, level, "A");
    let b = world.new_object(types.item, a, Some("B")).unwrap();
    let refs = Value::Array(vec![Value::Object(Some(b)), Value::Object(None), Value::Object(Some(a))]);
    world.set_field(a, "Refs", refs).unwrap();

    let json = save(&world, &extend, &[Some(a)]).into_json();
    assert_eq!(json["Actors"], json!([1]));
    assert_eq!(record(&json, "1")["Refs"], json!([2, 0, 1]));
    assert_eq!(record(&json, "1")["__SubObjects"]["2"]["__Name"], json!("B"));
    assert!(record(&json, "2").is_null());
}

#[test]
fn assets_are_external_once() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let items = world.create_package("Items").unwrap();
    let sword = world.new_asset(types.item, items, "Sword").unwrap();
    let a = spawn(&mut world, &types, level, "A");
    let b = spawn(&mut world, &types, level, "B");
    world.set_field(a, "Weapon", Value::Object(Some(sword))).unwrap();
    world.set_field(b, "Weapon", Value::Object(Some(sword))).unwrap();

    let document = save(&world, &extend, &[Some(a), Some(b)]);
    let json = document.clone().into_json();
    assert_eq!(json["__ExternalObjects"], json!({ "-1": "game.Pawn", "-2": "/Items/Sword" }));
    assert_eq!(record(&json, "1")["Weapon"], json!(-2));
    assert_eq!(record(&json, "2")["Weapon"], json!(-2));

    let (mut target, level) = new_world(&types);
    let items = target.create_package("Items").unwrap();
    let sword = target.new_asset(types.item, items, "Sword").unwrap();
    let de = load(&document, &extend, &mut target, level);
    for actor in de.objects("Actors").unwrap().into_iter().flatten() {
        assert_eq!(target.field(actor, "Weapon"), Some(&Value::Object(Some(sword))));
    }
}

#[test]
fn notify_fires_once() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");
    world.set_field(hero, "Health", Value::Int(10)).unwrap();
    world.set_field(hero, "Armor", Value::Int(5)).unwrap();
    let document = save(&world, &extend, &[Some(hero)]);

    let calls = Arc::new(AtomicUsize::new(0));
    let (mut target, level) = new_world(&types);
    let counter = Arc::clone(&calls);
    target.set_hooks(
        types.pawn,
        ClassHooks::new().on_notify("OnRep_Vitals", move |world, id, prior| {
            assert_eq!(prior, &Value::Int(100));
            assert_eq!(world.field(id, "Health"), Some(&Value::Int(10)));
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    );

    load(&document, &extend, &mut target, level);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn unparsed_map_keys_are_lossy() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");
    let key = Value::Struct(DynamicStruct::new(Some(types.point)).with("X", 4_i64));
    world.set_field(hero, "Spots", Value::Map(vec![(key, Value::Int(9))])).unwrap();

    let document = save(&world, &extend, &[Some(hero)]);
    let json = document.clone().into_json();
    assert_eq!(record(&json, "1")["Spots"], json!({ "Unparsed Key 0": 9 }));

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let hero = de.object_by_idx(1).unwrap();
    assert_eq!(target.field(hero, "Spots"), Some(&Value::Map(Vec::new())));
}

#[test]
fn large_integer_from_string() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let document = SaveDocument::from_value(json!({
        "__ExternalObjects": { "-1": "game.Pawn" },
        "__DynamicObjects": {
            "1": { "__Name": "Hero", "__Class": -1, "Big": "9007199254740993" }
        },
        "Actors": [1]
    }))
    .unwrap();

    let (mut world, level) = new_world(&types);
    let de = load(&document, &extend, &mut world, level);
    let hero = de.object_by_idx(1).unwrap();
    assert_eq!(world.field(hero, "Big"), Some(&Value::Int(9_007_199_254_740_993)));
}

#[test]
fn dangling_owner() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let a = spawn(&mut world, &types, level, "A");
    let b = spawn(&mut world, &types, level, "B");
    let gem = world.new_object(types.item, b, Some("Gem")).unwrap();
    world.set_field(a, "Refs", Value::Array(vec![Value::Object(Some(gem))])).unwrap();

    let json = save(&world, &extend, &[Some(a)]).into_json();
    assert_eq!(record(&json, "1")["Refs"], json!([-2]));
    assert_eq!(json["__ExternalObjects"]["-2"], json!("/Arena/B/Gem"));

    let config = SerializeConfig {
        strict_ownership: true,
        ..SerializeConfig::default()
    };
    let mut ser = GraphSerializer::with_config(&world, &extend, config);
    let err = ser.add_objects("Actors", &[Some(a)]).unwrap_err();
    assert!(matches!(err, SerializeError::Encode(_)));
    assert!(err.to_string().contains("/Arena/B/Gem"));
}

#[test]
fn phases_run_in_order() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let document = SaveDocument::new();

    let mut de = GraphDeserializer::new(&document, level, &extend);
    assert_eq!(
        de.load_dynamic_object_data(&mut world),
        Err(DeserializeError::PhaseOrder {
            expected: Phase::Instanced,
            actual: Phase::Created,
        })
    );
    de.load_external_objects(&world).unwrap();
    assert!(de.load_external_objects(&world).is_err());
    de.instance_dynamic_objects(&mut world).unwrap();
    assert!(de.retarget_dynamic_object_name("Actors", "Late").is_err());
}

#[test]
fn missing_class_skips_subtree() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let document = SaveDocument::from_value(json!({
        "__ExternalObjects": { "-1": "game.Removed", "-2": "game.Item" },
        "__DynamicObjects": {
            "1": {
                "__Name": "Ghost",
                "__Class": -1,
                "__SubObjects": { "2": { "__Name": "Orb", "__Class": -2 } }
            }
        },
        "Actors": [1]
    }))
    .unwrap();

    let (mut world, level) = new_world(&types);
    let de = load(&document, &extend, &mut world, level);
    assert_eq!(de.objects("Actors").unwrap(), [None]);
    assert_eq!(de.instanced_objects().count(), 0);
}

#[test]
fn owned_actors_and_extend_data() {
    let types = types();
    let extend = ExtendDataRegistry::with_defaults();
    let (mut world, level) = new_world(&types);
    let boss = spawn(&mut world, &types, level, "Boss");
    let minion = world
        .spawn_actor(types.pawn, level, SpawnParams::default().with_owner(Some(boss)))
        .unwrap();
    let minion_name = world.get(minion).unwrap().name().to_owned();
    assert!(minion_name.starts_with("Boss_Pawn"));

    let document = save(&world, &extend, &[Some(boss), Some(minion)]);
    let json = document.clone().into_json();
    assert_eq!(json["Actors"], json!([1, 2]));
    let nested = &record(&json, "1")["__SubObjects"]["2"];
    assert_eq!(nested["__Name"], json!(minion_name));
    assert_eq!(nested["__ExtendData"]["Owner"], json!(1));
    assert_eq!(json["__ExternalObjects"]["-2"], json!("core.ActorExtendData"));

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let [Some(boss), Some(minion)] = de.objects("Actors").unwrap()[..] else {
        panic!("actors were not loaded");
    };
    assert_eq!(target.owner(minion), Some(boss));
    assert_eq!(target.level_of(minion), Some(level));
    assert_eq!(target.actors_in(level), [boss, minion]);
}

#[test]
fn existing_objects_are_reused_or_moved_aside() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");
    world.set_field(hero, "Health", Value::Int(7)).unwrap();
    let document = save(&world, &extend, &[Some(hero)]);

    world.set_field(hero, "Health", Value::Int(99)).unwrap();
    let de = load(&document, &extend, &mut world, level);
    assert_eq!(de.objects("Actors").unwrap(), [Some(hero)]);
    assert!(de.spawned_actors().is_empty());
    assert_eq!(world.field(hero, "Health"), Some(&Value::Int(7)));

    world.destroy(hero).unwrap();
    let de = load(&document, &extend, &mut world, level);
    let reloaded = de.object_by_idx(1).unwrap();
    assert_ne!(reloaded, hero);
    assert_eq!(world.path_of(reloaded).as_deref(), Some("/Arena/Hero"));
    assert!(world.path_of(hero).unwrap().starts_with("/Transient/Hero_"));
}

#[test]
fn retargeted_name() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");

    let mut ser = GraphSerializer::new(&world, &extend);
    ser.add_object("Player", Some(hero)).unwrap();
    let document = ser.finish();
    assert_eq!(document.get("Player"), Some(&json!(1)));

    let (mut target, level) = new_world(&types);
    let mut de = GraphDeserializer::new(&document, level, &extend);
    de.retarget_dynamic_object_name("Player", "Hero2").unwrap();
    de.load_all(&mut target).unwrap();
    let player = de.object("Player").unwrap().unwrap();
    assert_eq!(target.path_of(player).as_deref(), Some("/Arena/Hero2"));
}

#[test]
fn struct_roots() {
    let types = types();
    let extend = ExtendDataRegistry::new();
    let (mut world, level) = new_world(&types);
    let hero = spawn(&mut world, &types, level, "Hero");

    let mut tint = types.registry.default_fields(builtin::COLOR).unwrap().clone();
    tint.insert("R", Value::Int(255));
    let value = DynamicStruct::new(Some(types.spawn_point))
        .with("Tint", tint)
        .with("Anchor", Value::Object(Some(hero)));

    let mut ser = GraphSerializer::new(&world, &extend);
    ser.add_object("Hero", Some(hero)).unwrap();
    ser.add_struct("Spawn", types.spawn_point, &value, None).unwrap();
    assert!(matches!(
        ser.add_struct("__Spawn", types.spawn_point, &value, None),
        Err(SerializeError::ReservedField(_))
    ));
    assert!(matches!(
        ser.add_struct("Other", types.pawn, &value, None),
        Err(SerializeError::NotAStruct(_))
    ));
    let document = ser.finish();
    assert_eq!(document.get("Spawn"), Some(&json!({ "Tint": "FF0000FF", "Anchor": 1 })));

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let loaded = de.struct_value(&target, "Spawn", types.spawn_point).unwrap();
    let hero = de.object_by_idx(1).unwrap();
    assert_eq!(loaded.get("Anchor"), Some(&Value::Object(Some(hero))));
    assert_eq!(
        loaded.get("Tint").and_then(Value::as_struct).and_then(|t| t.get("R")),
        Some(&Value::Int(255))
    );
}

#[test]
fn owned_root_referenced_before_its_owner() {
    let types = types();
    let extend = ExtendDataRegistry::with_defaults();
    let (mut world, level) = new_world(&types);
    let scout = spawn(&mut world, &types, level, "Scout");
    let boss = spawn(&mut world, &types, level, "Boss");
    let minion = world
        .spawn_actor(types.pawn, level, SpawnParams::default().with_owner(Some(boss)))
        .unwrap();
    world.set_field(minion, "Health", Value::Int(42)).unwrap();
    world.set_field(scout, "Friend", Value::Object(Some(minion))).unwrap();

    let document = save(&world, &extend, &[Some(scout), Some(boss), Some(minion)]);
    let json = document.clone().into_json();
    assert_eq!(json["Actors"], json!([1, 2, 3]));
    assert_eq!(record(&json, "1")["Friend"], json!(3));
    assert_eq!(record(&json, "2")["__SubObjects"]["3"]["Health"], json!(42));
    assert!(record(&json, "3").is_null());
    assert_eq!(
        json["__ExternalObjects"],
        json!({ "-1": "game.Pawn", "-2": "core.ActorExtendData" })
    );

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let [Some(scout), Some(boss), Some(minion)] = de.objects("Actors").unwrap()[..] else {
        panic!("actors were not loaded");
    };
    assert_eq!(target.field(minion, "Health"), Some(&Value::Int(42)));
    assert_eq!(target.field(scout, "Friend"), Some(&Value::Object(Some(minion))));
    assert_eq!(target.owner(minion), Some(boss));
}

#[test]
fn owned_roots_nest_outermost_first() {
    let types = types();
    let extend = ExtendDataRegistry::with_defaults();
    let (mut world, level) = new_world(&types);
    let boss = spawn(&mut world, &types, level, "Boss");
    let minion = world
        .spawn_actor(types.pawn, level, SpawnParams::default().with_owner(Some(boss)))
        .unwrap();
    let pet = world
        .spawn_actor(types.pawn, level, SpawnParams::default().with_owner(Some(minion)))
        .unwrap();

    let document = save(&world, &extend, &[Some(pet), Some(minion), Some(boss)]);
    let json = document.clone().into_json();
    assert_eq!(json["Actors"], json!([3, 2, 1]));
    let nested = &record(&json, "1")["__SubObjects"]["2"]["__SubObjects"]["3"];
    assert_eq!(nested["__Name"], json!(world.get(pet).unwrap().name()));

    let (mut target, level) = new_world(&types);
    let de = load(&document, &extend, &mut target, level);
    let [Some(pet), Some(minion), Some(boss)] = de.objects("Actors").unwrap()[..] else {
        panic!("actors were not loaded");
    };
    assert_eq!(target.owner(pet), Some(minion));
    assert_eq!(target.owner(minion), Some(boss));
}

#[test]
fn extend_data_without_type_is_skipped() {
    let types = types();
    let extend = ExtendDataRegistry::with_defaults();
    let document = SaveDocument::from_value(json!({
        "__ExternalObjects": { "-1": "game.Pawn", "-2": "game.Removed" },
        "__DynamicObjects": {
            "1": {
                "__Name": "Boss",
                "__Class": -1,
                "__SubObjects": {
                    "2": {
                        "__Name": "Boss_Pawn_1",
                        "__Class": -1,
                        "Health": 5,
                        "__ExtendData": { "__Type": -2, "Owner": 1 }
                    }
                }
            }
        },
        "Actors": [1, 2]
    }))
    .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let (mut world, level) = new_world(&types);
    let counter = Arc::clone(&calls);
    world.set_hooks(
        types.pawn,
        ClassHooks::new().on_notify("OnRep_Vitals", move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
    );

    let de = load(&document, &extend, &mut world, level);
    let [Some(boss), Some(minion)] = de.objects("Actors").unwrap()[..] else {
        panic!("actors were not loaded");
    };
    assert_eq!(world.owner(minion), Some(boss));
    assert_eq!(world.field(minion, "Health"), Some(&Value::Int(5)));
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

// -----------------------------------------------------------------------------
// Extend data and notifies

/// Saves a constant mood and logs when it is restored.
struct MoodFactory {
    ty: TypeHandle,
    fires_replay: bool,
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ExtendDataFactory for MoodFactory {
    fn pre_save(&self, _world: &World, _object: ObjectId) -> ExtendDataContainer {
        ExtendDataContainer::new(self.ty, DynamicStruct::default().with("Mood", 7_i64))
    }

    fn post_load(&self, world: &mut World, _object: ObjectId, data: &ExtendDataContainer, replay: &NotifyReplay) {
        assert_eq!(data.payload().get("Mood"), Some(&Value::Int(7)));
        self.events.lock().unwrap().push("restored");
        if self.fires_replay {
            replay.fire(world);
            self.events.lock().unwrap().push("fired");
        }
    }
}

fn mood_round_trip(fires_replay: bool) -> Vec<&'static str> {
    let mut registry = TypeRegistry::new();
    let mood = registry
        .register_struct(StructInfo::new("game.Mood").with_field(NamedField::new("Mood", FieldType::Int)))
        .unwrap();
    let pawn = registry
        .register_class(
            ClassInfo::new("game.Pawn", Some(builtin::ACTOR))
                .with_field(NamedField::new("Health", FieldType::Int).with_notify("OnRep_Health")),
        )
        .unwrap();
    let registry = Arc::new(registry);

    let events = Arc::new(Mutex::new(Vec::new()));
    let mut extend = ExtendDataRegistry::new();
    extend.register(
        pawn,
        MoodFactory {
            ty: mood,
            fires_replay,
            events: Arc::clone(&events),
        },
    );

    let mut world = World::new(Arc::clone(&registry));
    let level = world.create_level("Arena").unwrap();
    let hero = world.spawn_actor(pawn, level, SpawnParams::named("Hero")).unwrap();
    world.set_field(hero, "Health", Value::Int(3)).unwrap();
    let document = save(&world, &extend, &[Some(hero)]);
    assert_eq!(
        record(&document.clone().into_json(), "1")["__ExtendData"],
        json!({ "__Type": -2, "Mood": 7 })
    );

    let mut target = World::new(registry);
    let level = target.create_level("Arena").unwrap();
    let sink = Arc::clone(&events);
    target.set_hooks(
        pawn,
        ClassHooks::new().on_notify("OnRep_Health", move |_, _, _| {
            sink.lock().unwrap().push("notify");
        }),
    );
    load(&document, &extend, &mut target, level);

    events.lock().unwrap().clone()
}

#[test]
fn factory_fires_notifies_itself() {
    assert_eq!(mood_round_trip(true), ["restored", "notify", "fired"]);
}

#[test]
fn notifies_fire_after_the_factory() {
    assert_eq!(mood_round_trip(false), ["restored", "notify"]);
}

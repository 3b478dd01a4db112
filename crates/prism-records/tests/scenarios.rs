//! End-to-end record scenarios: build, stamp, filter and hand off.

use std::sync::Mutex;

use prism_filter::{FilterList, FilterRules};
use prism_records::{
    BlockSnapshot, BlockTransaction, Cause, CauseObject, Entity, FilterReason, Player, Position,
    PrismRecord, RecordSink, SaveOutcome, World,
};
use prism_types::{keys, Document, Value};
use uuid::Uuid;

/// Collects every document handed off, counting calls.
#[derive(Default)]
struct CapturingSink {
    documents: Mutex<Vec<Document>>,
}

impl CapturingSink {
    fn count(&self) -> usize {
        self.documents.lock().expect("sink lock").len()
    }

    fn take_one(&self) -> Document {
        let mut docs = self.documents.lock().expect("sink lock");
        assert_eq!(docs.len(), 1, "expected exactly one queued document");
        docs.remove(0)
    }
}

impl RecordSink for CapturingSink {
    fn add(&self, document: Document) {
        self.documents.lock().expect("sink lock").push(document);
    }
}

fn snapshot_at(block_type: &str, x: i32, y: i32, z: i32) -> BlockSnapshot {
    BlockSnapshot {
        world_uuid: Uuid::from_u128(42),
        world_name: Some("world".to_string()),
        position: Position { x, y, z },
        block_type: block_type.to_string(),
        traits: Document::new(),
        unsafe_data: None,
    }
}

fn stone_broken() -> BlockTransaction {
    BlockTransaction::new(snapshot_at("stone", 1, 2, 3), snapshot_at("air", 1, 2, 3))
}

fn player_u1() -> Player {
    Player {
        uuid: Uuid::from_u128(1),
        name: "u1".to_string(),
    }
}

fn assert_exactly_one_attribution(doc: &Document) {
    assert!(
        doc.contains(keys::PLAYER) ^ doc.contains(keys::CAUSE),
        "exactly one of player/cause must be present"
    );
}

#[test]
fn player_breaking_stone_is_recorded() {
    let sink = CapturingSink::default();
    let tx = stone_broken();

    let outcome = PrismRecord::create()
        .player(&player_u1())
        .broke_block(Some(&tx))
        .expect("should build")
        .save(&FilterList::permissive(), &sink);

    assert_eq!(outcome, SaveOutcome::Queued);
    let doc = sink.take_one();
    assert_eq!(
        doc.get_str(keys::PLAYER),
        Some(Uuid::from_u128(1).to_string().as_str())
    );
    assert_eq!(doc.get_str(keys::EVENT_NAME), Some("block-break"));
    assert_eq!(doc.get_str(keys::original_block_type()), Some("stone"));
    assert_eq!(doc.get_str(keys::replacement_block_type()), Some("air"));
    assert!(!doc.contains("location.world-name"));
    assert!(!doc.contains(keys::CAUSE));
    assert!(matches!(doc.get(keys::CREATED), Some(Value::Timestamp(_))));
}

#[test]
fn zombie_cause_is_recorded_under_cause() {
    let sink = CapturingSink::default();
    let cause = Cause::of(vec![CauseObject::Entity(Entity {
        entity_type: "Zombie".to_string(),
    })]);

    let outcome = PrismRecord::create()
        .source(&cause)
        .expect("should bind")
        .broke_block(Some(&stone_broken()))
        .expect("should build")
        .save(&FilterList::permissive(), &sink);

    assert_eq!(outcome, SaveOutcome::Queued);
    let doc = sink.take_one();
    assert_eq!(doc.get_str(keys::CAUSE), Some("Zombie"));
    assert!(!doc.contains(keys::PLAYER));
}

#[test]
fn world_cause_is_recorded_by_world_name() {
    let sink = CapturingSink::default();
    let cause = Cause::of(vec![CauseObject::World(World {
        uuid: Uuid::from_u128(42),
        name: "world".to_string(),
    })]);

    PrismRecord::create()
        .source(&cause)
        .expect("should bind")
        .grew_block(Some(&stone_broken()))
        .expect("should build")
        .save(&FilterList::permissive(), &sink);

    let doc = sink.take_one();
    assert_eq!(doc.get_str(keys::CAUSE), Some("world"));
    assert_ne!(doc.get_str(keys::CAUSE), Some(keys::ENVIRONMENT));
}

#[test]
fn unidentified_cause_is_recorded_as_environment() {
    let sink = CapturingSink::default();
    let cause = Cause::of(vec![CauseObject::Other {
        description: "piston".to_string(),
    }]);

    PrismRecord::create()
        .source(&cause)
        .expect("should bind")
        .placed_block(Some(&stone_broken()))
        .expect("should build")
        .save(&FilterList::permissive(), &sink);

    let doc = sink.take_one();
    assert_eq!(doc.get_str(keys::CAUSE), Some(keys::ENVIRONMENT));
}

#[test]
fn denied_original_block_never_reaches_sink() {
    let sink = CapturingSink::default();
    let filters = FilterList::new(FilterRules::permissive(), FilterRules::new([], ["stone"]));

    let outcome = PrismRecord::create()
        .player(&player_u1())
        .broke_block(Some(&stone_broken()))
        .expect("should build")
        .save(&filters, &sink);

    assert_eq!(
        outcome,
        SaveOutcome::Filtered(FilterReason::OriginalBlock("stone".to_string()))
    );
    assert_eq!(sink.count(), 0, "sink must not be invoked");
}

#[test]
fn denied_replacement_block_never_reaches_sink() {
    let sink = CapturingSink::default();
    let filters = FilterList::new(FilterRules::permissive(), FilterRules::new([], ["air"]));

    let outcome = PrismRecord::create()
        .player(&player_u1())
        .broke_block(Some(&stone_broken()))
        .expect("should build")
        .save(&filters, &sink);

    assert_eq!(
        outcome,
        SaveOutcome::Filtered(FilterReason::ReplacementBlock("air".to_string()))
    );
    assert_eq!(sink.count(), 0);
}

#[test]
fn denied_source_never_reaches_sink() {
    let sink = CapturingSink::default();
    let filters = FilterList::new(FilterRules::new([], ["u1"]), FilterRules::permissive());

    let outcome = PrismRecord::create()
        .player(&player_u1())
        .joined()
        .save(&filters, &sink);

    assert_eq!(outcome, SaveOutcome::Filtered(FilterReason::Source));
    assert_eq!(sink.count(), 0);
}

#[test]
fn block_rules_do_not_affect_blockless_records() {
    let sink = CapturingSink::default();
    let filters = FilterList::new(FilterRules::permissive(), FilterRules::new([], ["*"]));

    PrismRecord::create()
        .player(&player_u1())
        .quit()
        .save(&filters, &sink);

    let doc = sink.take_one();
    assert_eq!(doc.get_str(keys::EVENT_NAME), Some("player-quit"));
    assert_exactly_one_attribution(&doc);
}

#[test]
fn every_kind_carries_exactly_one_attribution() {
    let sink = CapturingSink::default();
    let filters = FilterList::permissive();
    let zombie = Entity {
        entity_type: "Zombie".to_string(),
    };
    let tx = stone_broken();

    PrismRecord::create().player(&player_u1()).joined().save(&filters, &sink);
    PrismRecord::create().entity(&zombie).killed(&zombie).save(&filters, &sink);
    PrismRecord::create()
        .entity(&zombie)
        .decayed_block(Some(&tx))
        .expect("should build")
        .save(&filters, &sink);

    let docs = sink.documents.lock().expect("sink lock");
    assert_eq!(docs.len(), 3);
    for doc in docs.iter() {
        assert_exactly_one_attribution(doc);
    }
}

#[test]
fn block_records_always_carry_both_snapshots() {
    let sink = CapturingSink::default();
    let tx = BlockTransaction::new(snapshot_at("air", 0, 0, 0), snapshot_at("dirt", 0, 0, 0));

    PrismRecord::create()
        .player(&player_u1())
        .placed_block(Some(&tx))
        .expect("should build")
        .save(&FilterList::permissive(), &sink);

    let doc = sink.take_one();
    assert!(doc.get_document(keys::ORIGINAL_BLOCK).is_some());
    assert!(doc.get_document(keys::REPLACEMENT_BLOCK).is_some());
    assert_eq!(doc.get_str(keys::original_block_type()), Some("air"));
}

#[test]
fn created_stamps_are_non_decreasing_across_saves() {
    let sink = CapturingSink::default();
    for _ in 0..50 {
        PrismRecord::create()
            .player(&player_u1())
            .joined()
            .save(&FilterList::permissive(), &sink);
    }

    let docs = sink.documents.lock().expect("sink lock");
    let stamps: Vec<_> = docs
        .iter()
        .map(|d| {
            d.get(keys::CREATED)
                .and_then(Value::as_timestamp)
                .expect("created should be a timestamp")
        })
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

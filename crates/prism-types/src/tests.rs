//! Unit tests for the document model.

use crate::{created_timestamp, keys, DataQuery, Document, Value};

fn block_snapshot() -> Document {
    let mut doc = Document::new();
    doc.set("block-state.block-type", "minecraft:stone");
    doc.set("position.x", 1);
    doc.set("position.y", 64);
    doc.set("position.z", -3);
    doc.set("world-uuid", "7f9a0d3c-1111-4c22-9d3e-0a1b2c3d4e5f");
    doc
}

// ── set / get ────────────────────────────────────────────────────────

#[test]
fn set_creates_intermediate_documents() {
    let mut doc = Document::new();
    doc.set("a.b.c", "deep");

    assert_eq!(doc.get_str("a.b.c"), Some("deep"));
    assert!(doc.get_document("a").is_some(), "a should be a document");
    assert!(doc.get_document("a.b").is_some(), "a.b should be a document");
}

#[test]
fn get_missing_path_is_absent_not_default() {
    let mut doc = Document::new();
    doc.set("flag", false);
    doc.set("count", 0);

    assert_eq!(doc.get("flag"), Some(&Value::Bool(false)));
    assert_eq!(doc.get("count"), Some(&Value::Integer(0)));
    assert_eq!(doc.get("missing"), None);
    assert_eq!(doc.get("flag.nested"), None, "scalars have no children");
}

#[test]
fn set_replaces_existing_value_in_place() {
    let mut doc = Document::new();
    doc.set("first", 1);
    doc.set("second", 2);
    doc.set("first", "one");

    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, vec!["first", "second"]);
    assert_eq!(doc.get_str("first"), Some("one"));
}

#[test]
fn set_through_scalar_replaces_it_with_document() {
    let mut doc = Document::new();
    doc.set("location", "somewhere");
    doc.set("location.x", 10);

    assert_eq!(doc.get("location.x"), Some(&Value::Integer(10)));
}

#[test]
fn set_nested_document_value_is_reachable_by_path() {
    let mut doc = Document::new();
    doc.set(keys::ORIGINAL_BLOCK, block_snapshot());

    assert_eq!(
        doc.get_str(keys::original_block_type()),
        Some("minecraft:stone")
    );
}

#[test]
fn every_set_path_reads_back_unchanged() {
    let written: Vec<(&str, Value)> = vec![
        ("event-name", Value::from("block-break")),
        ("player", Value::from("u1")),
        ("location.x", Value::from(1)),
        ("location.y", Value::from(2.5)),
        ("location.z", Value::from(-3)),
        ("original-block.block-state.block-type", Value::from("stone")),
        ("original-block.unsafe-data.lit", Value::from(true)),
    ];

    let mut doc = Document::new();
    for (path, value) in &written {
        doc.set(*path, value.clone());
    }

    for (path, value) in &written {
        assert_eq!(doc.get(*path), Some(value), "path {path} should round-trip");
    }
}

#[test]
fn empty_query_addresses_nothing() {
    let mut doc = Document::new();
    doc.set("", "ignored");
    assert!(doc.is_empty());
    assert_eq!(doc.get(DataQuery::default()), None);
    assert_eq!(doc.remove(DataQuery::default()), None);
}

// ── remove ───────────────────────────────────────────────────────────

#[test]
fn remove_returns_value_and_drops_key() {
    let mut doc = block_snapshot();
    let removed = doc.remove("world-uuid");

    assert!(removed.is_some());
    assert!(!doc.contains("world-uuid"));
}

#[test]
fn remove_nested_leaves_siblings() {
    let mut doc = block_snapshot();
    doc.remove("position.x");

    assert!(!doc.contains("position.x"));
    assert_eq!(doc.get("position.y"), Some(&Value::Integer(64)));
}

#[test]
fn remove_missing_path_is_noop() {
    let mut doc = block_snapshot();
    let before = doc.clone();

    assert_eq!(doc.remove("nope"), None);
    assert_eq!(doc.remove("position.w"), None);
    assert_eq!(doc.remove("world-uuid.inner"), None);
    assert_eq!(doc, before);
}

#[test]
fn remove_keeps_order_of_remaining_keys() {
    let mut doc = Document::new();
    doc.set("a", 1);
    doc.set("b", 2);
    doc.set("c", 3);
    doc.set("d", 4);

    doc.remove("b");
    doc.set("b", 5);

    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, vec!["a", "c", "d", "b"]);
}

#[test]
fn large_document_round_trips_in_order() {
    let mut doc = Document::new();
    for i in (0..200).rev() {
        doc.set(format!("key-{i}").as_str(), i);
    }
    doc.set("key-150", "replaced");

    let json = serde_json::to_string(&doc).expect("should serialize");
    let back: Document = serde_json::from_str(&json).expect("should deserialize");

    let keys: Vec<&str> = back.keys().collect();
    assert_eq!(keys.first(), Some(&"key-199"));
    assert_eq!(keys.last(), Some(&"key-0"));
    assert_eq!(keys[49], "key-150");
    assert_eq!(back.get_str("key-150"), Some("replaced"));
    assert_eq!(back.len(), 200);
}

// ── queries ──────────────────────────────────────────────────────────

#[test]
fn query_parse_and_then_agree() {
    let parsed = DataQuery::parse("original-block.block-state.block-type");
    let built = DataQuery::of([keys::ORIGINAL_BLOCK])
        .then(keys::BLOCK_STATE)
        .then(keys::BLOCK_TYPE);

    assert_eq!(parsed, built);
    assert_eq!(parsed, keys::original_block_type());
    assert_eq!(parsed.to_string(), "original-block.block-state.block-type");
}

#[test]
fn query_parse_skips_empty_segments() {
    let query = DataQuery::parse("a..b.");
    assert_eq!(query, DataQuery::of(["a", "b"]));
}

// ── serialization ────────────────────────────────────────────────────

#[test]
fn serializes_in_insertion_order() {
    let mut doc = Document::new();
    doc.set("zeta", 1);
    doc.set("alpha", "a");
    doc.set("mid.inner", true);

    let json = serde_json::to_string(&doc).expect("should serialize");
    assert_eq!(json, r#"{"zeta":1,"alpha":"a","mid":{"inner":true}}"#);
}

#[test]
fn deserializes_nested_objects_as_documents() {
    let doc: Document = serde_json::from_str(
        r#"{"block-state":{"block-type":"minecraft:dirt"},"lit":false,"level":3,"ratio":0.5}"#,
    )
    .expect("should deserialize");

    assert_eq!(doc.get_str("block-state.block-type"), Some("minecraft:dirt"));
    assert_eq!(doc.get("lit"), Some(&Value::Bool(false)));
    assert_eq!(doc.get("level"), Some(&Value::Integer(3)));
    assert_eq!(doc.get("ratio"), Some(&Value::Float(0.5)));
    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, vec!["block-state", "lit", "level", "ratio"]);
}

#[test]
fn timestamps_serialize_as_rfc3339() {
    let mut doc = Document::new();
    let now = created_timestamp();
    doc.set(keys::CREATED, now);

    let json: serde_json::Value = serde_json::to_value(&doc).expect("should serialize");
    let text = json["created"].as_str().expect("created should be a string");
    let parsed = chrono::DateTime::parse_from_rfc3339(text).expect("should parse as rfc3339");
    assert_eq!(parsed.with_timezone(&chrono::Utc), now);
}

// ── clock ────────────────────────────────────────────────────────────

#[test]
fn created_timestamps_never_go_backwards() {
    let mut previous = created_timestamp();
    for _ in 0..1_000 {
        let next = created_timestamp();
        assert!(next >= previous, "timestamps must be non-decreasing");
        previous = next;
    }
}

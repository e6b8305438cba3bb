//! Interpretation of SimpleDB response bodies.
//!
//! The store answers a read with plain JSON: a leaf comes back wrapped in a
//! metadata envelope, a folder comes back as an object mapping child names to
//! further leaves or folders. Both are ordinary JSON objects, so the shape
//! itself carries the distinction. An object is a leaf exactly when it has a
//! `value` key and nothing else besides the fixed metadata keys; everything
//! else is a folder whose children are classified recursively.
//!
//! The rule has a known blind spot: an application value stored with exactly
//! the envelope shape (`value` plus only metadata-named keys) is
//! indistinguishable from a real envelope, because the wire format carries no
//! explicit discriminant.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bookkeeping keys the store wraps around every stored value.
pub const METADATA_KEYS: [&str; 4] = ["created_at", "created_by", "updated_at", "updated_by"];

/// Whether `key` is one of the reserved metadata keys.
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.contains(&key)
}

/// Classification of a JSON object returned by the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// A metadata envelope around exactly one stored value.
    Leaf(&'a Value),
    /// A folder whose entries are themselves leaves or folders.
    Folder(&'a Map<String, Value>),
}

/// Classify a JSON object as a leaf envelope or a folder.
///
/// An object is a leaf iff it contains the key `value` and every other key
/// is one of [`METADATA_KEYS`]. Any other object is a folder, even when it
/// contains a `value` child among unrelated siblings.
pub fn classify(object: &Map<String, Value>) -> Shape<'_> {
    if object.contains_key("value") && object.keys().all(|k| k == "value" || is_metadata_key(k)) {
        Shape::Leaf(&object["value"])
    } else {
        Shape::Folder(object)
    }
}

/// Recursively remove metadata envelopes, leaving only application data.
///
/// - A leaf envelope collapses to its `value`, returned verbatim: the stored
///   value is opaque application data, so envelope-shaped objects nested
///   inside it stay intact.
/// - A folder keeps its non-metadata keys, with each child stripped.
/// - An array is stripped element-wise, preserving order and length.
/// - Scalars pass through unchanged.
///
/// The input is never mutated; a new structure is produced.
pub fn strip(item: &Value) -> Value {
    match item {
        Value::Object(object) => match classify(object) {
            Shape::Leaf(value) => value.clone(),
            Shape::Folder(children) => Value::Object(
                children
                    .iter()
                    .filter(|(key, _)| !is_metadata_key(key))
                    .map(|(key, child)| (key.clone(), strip(child)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.iter().map(strip).collect()),
        other => other.clone(),
    }
}

/// Typed view of a leaf envelope, for callers that read with metadata.
///
/// The store may omit individual metadata fields; anything beyond the
/// reserved set is rejected, matching [`classify`]'s leaf rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Value>,
}

impl Envelope {
    /// Parse an envelope from a raw response value.
    ///
    /// Returns `None` exactly when [`classify`] would not call the value a
    /// leaf (non-object, missing `value`, or keys outside the reserved set).
    pub fn from_value(value: &Value) -> Option<Envelope> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== classify tests ====================

    #[test]
    fn classify_full_envelope_as_leaf() {
        let raw = json!({
            "value": {"message": "hi"},
            "created_at": "2026-01-01T00:00:00Z",
            "created_by": "alice",
            "updated_at": "2026-01-02T00:00:00Z",
            "updated_by": "bob",
        });
        let object = raw.as_object().unwrap();
        assert_eq!(classify(object), Shape::Leaf(&json!({"message": "hi"})));
    }

    #[test]
    fn classify_value_only_as_leaf() {
        let raw = json!({"value": 42});
        assert_eq!(classify(raw.as_object().unwrap()), Shape::Leaf(&json!(42)));
    }

    #[test]
    fn classify_partial_metadata_as_leaf() {
        let raw = json!({"value": "x", "created_at": "2026-01-01T00:00:00Z"});
        assert_eq!(classify(raw.as_object().unwrap()), Shape::Leaf(&json!("x")));
    }

    #[test]
    fn classify_extra_key_as_folder() {
        let raw = json!({"value": 1, "created_at": "t", "extra": 2});
        let object = raw.as_object().unwrap();
        assert_eq!(classify(object), Shape::Folder(object));
    }

    #[test]
    fn classify_missing_value_as_folder() {
        let raw = json!({"created_at": "t", "created_by": "alice"});
        let object = raw.as_object().unwrap();
        assert_eq!(classify(object), Shape::Folder(object));
    }

    #[test]
    fn classify_empty_object_as_folder() {
        let raw = json!({});
        let object = raw.as_object().unwrap();
        assert_eq!(classify(object), Shape::Folder(object));
    }

    // ==================== strip tests ====================

    fn envelope(value: Value) -> Value {
        json!({
            "value": value,
            "created_at": "2026-01-01T00:00:00Z",
            "created_by": "alice",
            "updated_at": "2026-01-02T00:00:00Z",
            "updated_by": "bob",
        })
    }

    #[test]
    fn strip_leaf_returns_value() {
        assert_eq!(
            strip(&envelope(json!({"message": "hi"}))),
            json!({"message": "hi"})
        );
    }

    #[test]
    fn strip_leaf_with_every_metadata_subset() {
        // For any subset of metadata keys alongside `value`, the object is
        // a leaf and strip yields the value.
        let meta: Vec<(&str, Value)> = METADATA_KEYS.iter().map(|k| (*k, json!("m"))).collect();
        for bits in 0..(1 << meta.len()) {
            let mut object = Map::new();
            object.insert("value".to_string(), json!([1, 2]));
            for (i, (key, v)) in meta.iter().enumerate() {
                if bits & (1 << i) != 0 {
                    object.insert(key.to_string(), v.clone());
                }
            }
            assert_eq!(strip(&Value::Object(object)), json!([1, 2]));
        }
    }

    #[test]
    fn strip_leaf_value_is_opaque() {
        // Envelopes nested inside a stored value are application data and
        // must survive untouched.
        let inner = envelope(json!("nested"));
        let raw = envelope(json!({"wrapped": inner}));
        assert_eq!(strip(&raw), json!({"wrapped": inner}));
    }

    #[test]
    fn strip_folder_recurses_into_children() {
        let raw = json!({
            "hello": envelope(json!({"message": "hi"})),
            "howdy": envelope(json!("partner")),
        });
        assert_eq!(
            strip(&raw),
            json!({"hello": {"message": "hi"}, "howdy": "partner"})
        );
    }

    #[test]
    fn strip_folder_drops_metadata_keys_at_each_level() {
        let raw = json!({
            "child": envelope(json!(1)),
            "created_at": "2026-01-01T00:00:00Z",
            "updated_by": "alice",
        });
        assert_eq!(strip(&raw), json!({"child": 1}));
    }

    #[test]
    fn strip_nested_folders() {
        let raw = json!({
            "a": {
                "b": envelope(json!({"message": "hi"})),
                "c": envelope(json!("x")),
            }
        });
        assert_eq!(strip(&raw), json!({"a": {"b": {"message": "hi"}, "c": "x"}}));
    }

    #[test]
    fn strip_object_with_value_and_unknown_sibling_is_folder() {
        let raw = json!({"value": envelope(json!(1)), "other": envelope(json!(2))});
        assert_eq!(strip(&raw), json!({"value": 1, "other": 2}));
    }

    #[test]
    fn strip_array_element_wise() {
        let raw = json!([envelope(json!(1)), json!("plain"), envelope(json!(3))]);
        assert_eq!(strip(&raw), json!([1, "plain", 3]));
    }

    #[test]
    fn strip_classifies_inside_array_elements() {
        let raw = json!({"items": [ {"child": envelope(json!("deep"))} ]});
        assert_eq!(strip(&raw), json!({"items": [{"child": "deep"}]}));
    }

    #[test]
    fn strip_scalars_unchanged() {
        for scalar in [json!(null), json!(true), json!(3), json!(2.5), json!("s")] {
            assert_eq!(strip(&scalar), scalar);
        }
    }

    #[test]
    fn strip_idempotent_on_envelope_free_input() {
        let plain = json!({
            "name": "alice",
            "tags": ["a", "b"],
            "nested": {"count": 3, "flags": [true, false]},
        });
        let once = strip(&plain);
        assert_eq!(once, plain);
        assert_eq!(strip(&once), once);
    }

    #[test]
    fn strip_does_not_mutate_input() {
        let raw = envelope(json!({"message": "hi"}));
        let copy = raw.clone();
        let _ = strip(&raw);
        assert_eq!(raw, copy);
    }

    #[test]
    fn strip_envelope_lookalike_collapses() {
        // Known blind spot: a stored value with exactly the envelope shape
        // is read back as a leaf and loses its wrapper.
        let lookalike = json!({"value": "payload", "created_at": "not a real timestamp"});
        assert_eq!(strip(&lookalike), json!("payload"));
    }

    // ==================== Envelope tests ====================

    #[test]
    fn envelope_from_full_value() {
        let raw = envelope(json!({"message": "hi"}));
        let parsed = Envelope::from_value(&raw).unwrap();
        assert_eq!(parsed.value, json!({"message": "hi"}));
        assert_eq!(parsed.created_by, Some(json!("alice")));
        assert_eq!(parsed.updated_by, Some(json!("bob")));
    }

    #[test]
    fn envelope_metadata_fields_optional() {
        let parsed = Envelope::from_value(&json!({"value": 7})).unwrap();
        assert_eq!(parsed.value, json!(7));
        assert!(parsed.created_at.is_none());
    }

    #[test]
    fn envelope_rejects_unknown_field() {
        assert!(Envelope::from_value(&json!({"value": 1, "extra": 2})).is_none());
    }

    #[test]
    fn envelope_rejects_missing_value() {
        assert!(Envelope::from_value(&json!({"created_at": "t"})).is_none());
    }

    #[test]
    fn envelope_rejects_non_object() {
        assert!(Envelope::from_value(&json!([1, 2])).is_none());
        assert!(Envelope::from_value(&json!("s")).is_none());
    }

    #[test]
    fn envelope_agrees_with_classify() {
        let cases = [
            json!({"value": 1}),
            json!({"value": 1, "created_at": "t"}),
            json!({"value": 1, "other": 2}),
            json!({"name": "x"}),
        ];
        for raw in cases {
            let is_leaf = matches!(classify(raw.as_object().unwrap()), Shape::Leaf(_));
            assert_eq!(Envelope::from_value(&raw).is_some(), is_leaf, "{raw}");
        }
    }
}

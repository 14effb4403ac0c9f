//! Schema enrichment.
//!
//! Merges the broker envelope into an owner-supplied schema, producing the
//! effective schema that is actually evaluated:
//! - Business: `metadata` object merged into the user's root
//! - Data change: user schema moved under `data` of a closed envelope
//! - Undefined: user schema as-is

use lazy_static::lazy_static;
use serde_json::{json, Map, Value};

use crate::error::EnrichmentError;
use crate::event_type::Category;

/// Pattern every `metadata.eid` must match.
pub const UUID_PATTERN: &str =
    "^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$";

/// Allowed `data_op` values: create, update, delete, snapshot.
pub const DATA_OPS: &[&str] = &["C", "U", "D", "S"];

/// Keywords lifted from the user schema to the data change envelope root.
/// `#/definitions/...` references resolve against the document root.
const HOISTED_KEYWORDS: &[&str] = &["$schema", "definitions", "$defs"];

const METADATA_REQUIRED: &[&str] = &["eid", "occurred_at"];

lazy_static! {
    /// Envelope fields of `metadata` that do not depend on the event type.
    static ref METADATA_PROPERTIES: Map<String, Value> = match json!({
        "eid": {"type": "string", "pattern": UUID_PATTERN},
        "occurred_at": {"type": "string"},
        "parent_eids": {
            "type": "array",
            "items": {"type": "string", "pattern": UUID_PATTERN}
        },
        "flow_id": {"type": "string"},
        "partition": {"type": "string"},
        "partition_compaction_key": {"type": "string"},
        "version": {"type": "string"},
        "span_ctx": {
            "type": "object",
            "additionalProperties": {"type": "string"}
        }
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
}

/// Schema produced by [`enrich`]; the only input the evaluator compiles.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSchema(Value);

impl EffectiveSchema {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Build the effective schema for an event type.
///
/// The user schema is never modified. Enriching a document that already
/// carries the broker envelope fails with [`EnrichmentError::AlreadyEnriched`];
/// a `properties`, `required` or `metadata` keyword of the wrong shape fails
/// with [`EnrichmentError::MalformedKeyword`].
pub fn enrich(
    category: Category,
    user_schema: &Value,
    event_type_name: &str,
) -> Result<EffectiveSchema, EnrichmentError> {
    let merged = match category {
        Category::Undefined => return Ok(EffectiveSchema(user_schema.clone())),
        Category::Business => {
            let mut root = checked_root(user_schema, event_type_name)?.clone();
            add_metadata(&mut root, event_type_name).map(|_| root)
        }
        Category::DataChange => {
            let original = checked_root(user_schema, event_type_name)?;
            data_change_envelope(original, event_type_name)
        }
    };

    let root = merged.map_err(|keyword| EnrichmentError::MalformedKeyword {
        event_type: event_type_name.to_string(),
        keyword,
    })?;

    log::debug!(
        "SCHEMA_ENRICHED event_type={} category={} required={}",
        event_type_name,
        category,
        root.get("required").cloned().unwrap_or(Value::Null)
    );

    Ok(EffectiveSchema(Value::Object(root)))
}

/// Whether `schema` already carries the broker metadata envelope.
///
/// Only a document holding every piece [`enrich`] adds counts: the UUID
/// `eid` pattern, a single-name `event_type` enum, the string-valued
/// `span_ctx`, `eid`/`occurred_at` required in metadata and `metadata`
/// required at the root.
pub fn is_enriched(schema: &Value) -> bool {
    let metadata = match schema.pointer("/properties/metadata") {
        Some(metadata) => metadata,
        None => return false,
    };

    let eid_pattern = metadata
        .pointer("/properties/eid/pattern")
        .and_then(Value::as_str);
    let single_event_type = metadata
        .pointer("/properties/event_type/enum")
        .and_then(Value::as_array)
        .map(|names| names.len() == 1 && names[0].is_string())
        .unwrap_or(false);
    let span_ctx = metadata.pointer("/properties/span_ctx/additionalProperties");

    eid_pattern == Some(UUID_PATTERN)
        && single_event_type
        && span_ctx == Some(&json!({"type": "string"}))
        && requires_all(metadata.get("required"), METADATA_REQUIRED)
        && requires_all(schema.get("required"), &["metadata"])
}

fn requires_all(required: Option<&Value>, names: &[&str]) -> bool {
    match required.and_then(Value::as_array) {
        Some(items) => names
            .iter()
            .all(|name| items.iter().any(|item| item.as_str() == Some(*name))),
        None => false,
    }
}

fn checked_root<'a>(
    user_schema: &'a Value,
    event_type_name: &str,
) -> Result<&'a Map<String, Value>, EnrichmentError> {
    let root = user_schema
        .as_object()
        .ok_or_else(|| EnrichmentError::NotAnObject {
            event_type: event_type_name.to_string(),
        })?;

    if is_enriched(user_schema) {
        return Err(EnrichmentError::AlreadyEnriched {
            event_type: event_type_name.to_string(),
        });
    }

    Ok(root)
}

fn metadata_schema(event_type_name: &str) -> Value {
    let mut properties = METADATA_PROPERTIES.clone();
    properties.insert(
        "event_type".to_string(),
        json!({"type": "string", "enum": [event_type_name]}),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": METADATA_REQUIRED,
    })
}

// Helpers below report the offending keyword as `Err`.

fn add_metadata(root: &mut Map<String, Value>, event_type_name: &str) -> Result<(), String> {
    let metadata = metadata_schema(event_type_name);
    let properties = object_entry(root, "properties")?;

    match properties.get_mut("metadata") {
        Some(existing) => deep_merge(existing, metadata, "metadata")?,
        None => {
            properties.insert("metadata".to_string(), metadata);
        }
    }

    append_required(root, &["metadata"])
}

fn data_change_envelope(
    original: &Map<String, Value>,
    event_type_name: &str,
) -> Result<Map<String, Value>, String> {
    let mut data = original.clone();
    let mut envelope = Map::new();

    envelope.insert("type".to_string(), json!("object"));
    for keyword in HOISTED_KEYWORDS {
        if let Some(section) = data.remove(*keyword) {
            envelope.insert(keyword.to_string(), section);
        }
    }
    envelope.insert("additionalProperties".to_string(), Value::Bool(false));

    let properties = object_entry(&mut envelope, "properties")?;
    properties.insert(
        "data_op".to_string(),
        json!({"type": "string", "enum": DATA_OPS}),
    );
    properties.insert("data_type".to_string(), json!({"type": "string"}));
    properties.insert("data".to_string(), Value::Object(data));

    add_metadata(&mut envelope, event_type_name)?;
    append_required(&mut envelope, Category::DataChange.extra_required_fields())?;

    Ok(envelope)
}

/// Merge `source` into `target`. Objects merge key by key, `required`
/// lists are unioned keeping `target` order, scalars are replaced. A
/// non-object `target` where `source` is an object is malformed.
fn deep_merge(target: &mut Value, source: Value, keyword: &str) -> Result<(), String> {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                if key == "required" {
                    let names: Vec<&str> = value
                        .as_array()
                        .map(|items| items.iter().filter_map(Value::as_str).collect())
                        .unwrap_or_default();
                    append_required(target, &names)
                        .map_err(|_| format!("{}.required", keyword))?;
                    continue;
                }
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value, &format!("{}.{}", keyword, key))?,
                    None => {
                        target.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (_, Value::Object(_)) => Err(keyword.to_string()),
        (target, source) => {
            *target = source;
            Ok(())
        }
    }
}

/// Append names to `required`, skipping ones already listed.
fn append_required(root: &mut Map<String, Value>, names: &[&str]) -> Result<(), String> {
    let required = root
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()));

    if let Value::Array(items) = required {
        for name in names {
            if !items.iter().any(|item| item.as_str() == Some(*name)) {
                items.push(Value::String(name.to_string()));
            }
        }
        Ok(())
    } else {
        Err("required".to_string())
    }
}

fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, String> {
    map.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| key.to_string())
}

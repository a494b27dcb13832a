//! Locating and decoding node records in loosely wrapped payloads.

use crate::error::ImportError;
use crate::wire::NodeRecord;
use blockflow_core::BlockId;
use serde_json::{Map, Value};

/// How many wrapper objects may sit around the node map container.
pub const MAX_WRAPPING: usize = 4;

/// Parses `text` and decodes its node records.
pub fn decode_str(text: &str) -> Result<Vec<NodeRecord>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(&value)
}

/// Decodes every well-formed node record in `value`, sorted by id.
///
/// Accepted shapes include `{ graph: { nodes: {..} } }`, Drawflow's own
/// `{ drawflow: { Home: { data: {..} } } }`, a bare `{ nodes: {..} }`
/// container and a bare node map. Records that fail to decode, and later
/// duplicates of an id, are skipped with a warning.
pub fn decode_value(value: &Value) -> Result<Vec<NodeRecord>, ImportError> {
    let nodes = find_node_map(value, MAX_WRAPPING).ok_or(ImportError::NodeMapNotFound)?;
    let mut records: Vec<NodeRecord> = Vec::with_capacity(nodes.len());
    for (key, raw) in nodes {
        match decode_record(key, raw) {
            Ok(record) if records.iter().any(|seen| seen.id == record.id) => {
                log::warn!("skipping node {key:?}: id {} appears twice", record.id);
            }
            Ok(record) => records.push(record),
            Err(err) => log::warn!("skipping malformed node {key:?}: {err}"),
        }
    }
    records.sort_by_key(|record| record.id);
    Ok(records)
}

fn decode_record(key: &str, raw: &Value) -> Result<NodeRecord, serde_json::Error> {
    let mut raw = raw.clone();
    if let Value::Object(fields) = &mut raw {
        if !fields.contains_key("id") {
            if let Ok(id) = key.trim().parse::<BlockId>() {
                fields.insert("id".to_owned(), Value::from(id));
            }
        }
    }
    serde_json::from_value(raw)
}

fn find_node_map(value: &Value, depth: usize) -> Option<&Map<String, Value>> {
    let object = value.as_object()?;
    for key in ["nodes", "data"] {
        if let Some(Value::Object(inner)) = object.get(key) {
            if inner.is_empty() || has_named_record(inner) {
                return Some(inner);
            }
        }
    }
    if is_bare_node_map(object) {
        return Some(object);
    }
    if depth == 0 {
        return None;
    }
    object
        .values()
        .find_map(|inner| find_node_map(inner, depth - 1))
}

fn has_named_record(object: &Map<String, Value>) -> bool {
    object
        .values()
        .any(|value| value.as_object().is_some_and(|record| record.contains_key("name")))
}

fn is_bare_node_map(object: &Map<String, Value>) -> bool {
    object.values().all(Value::is_object) && has_named_record(object)
}

#[cfg(test)]
#[path = "tests/decode_tests.rs"]
mod tests;

//! JSON document view of the store.
//!
//! Store handlers that keep the whole tree as one JSON value share these
//! helpers: reading a poll snapshot out of it and applying an update batch
//! with multi-path semantics (all writes land or none do).

use crate::batch::UpdateBatch;
use crate::errors::{PollError, PollResult};
use crate::path::{PollId, StorePath};
use crate::snapshot::PollSnapshot;
use serde_json::{Map, Value};

/// Document with an empty `polls` collection.
pub fn empty_document() -> Value {
    serde_json::json!({ "polls": [] })
}

/// Document holding `snapshot` as poll `0`.
pub fn document_with_poll(snapshot: &PollSnapshot) -> PollResult<Value> {
    let poll = serde_json::to_value(snapshot)?;
    Ok(serde_json::json!({ "polls": [poll] }))
}

/// Value stored at `path`, if present.
pub fn value_at<'a>(document: &'a Value, path: &StorePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |node, segment| child(node, segment))
}

/// Decode the poll stored at `polls/{poll}`.
pub fn read_snapshot(document: &Value, poll: PollId) -> PollResult<PollSnapshot> {
    let path = StorePath::poll(poll);
    let node = value_at(document, &path)
        .filter(|node| !node.is_null())
        .ok_or_else(|| PollError::storage(format!("no poll stored at {path}")))?;

    Ok(serde_json::from_value(node.clone())?)
}

/// Store `snapshot` at `polls/{poll}`, replacing what was there.
pub fn write_snapshot(document: &mut Value, poll: PollId, snapshot: &PollSnapshot) -> PollResult<()> {
    let node = serde_json::to_value(snapshot)?;
    set(document, &StorePath::poll(poll), node)
}

/// Apply every write in `batch` to `document`.
///
/// Writes are staged on a copy, so a failing path leaves `document` untouched.
pub fn apply_batch(document: &mut Value, batch: &UpdateBatch) -> PollResult<()> {
    let mut staged = document.clone();
    for (path, value) in batch {
        set(&mut staged, path, Value::String(value.clone()))?;
    }
    *document = staged;
    Ok(())
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Numeric segments index into arrays when the parent is an array; the index
/// must already exist.
pub fn set(document: &mut Value, path: &StorePath, value: Value) -> PollResult<()> {
    let (leaf, parents) = path
        .segments()
        .split_last()
        .ok_or_else(|| PollError::invalid("cannot write to the document root"))?;

    let mut node = document;
    for segment in parents {
        node = child_mut(node, segment, path)?;
    }

    match node {
        Value::Array(items) => {
            let slot = array_slot(items, leaf, path)?;
            *slot = value;
        }
        other => {
            ensure_object(other)?.insert(leaf.clone(), value);
        }
    }
    Ok(())
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str, path: &StorePath) -> PollResult<&'a mut Value> {
    match node {
        Value::Array(items) => array_slot(items, segment, path),
        other => Ok(ensure_object(other)?
            .entry(segment.to_string())
            .or_insert(Value::Null)),
    }
}

fn array_slot<'a>(items: &'a mut [Value], segment: &str, path: &StorePath) -> PollResult<&'a mut Value> {
    let index: usize = segment
        .parse()
        .map_err(|_| PollError::invalid(format!("{path}: {segment:?} is not an array index")))?;
    let len = items.len();
    items
        .get_mut(index)
        .ok_or_else(|| PollError::invalid(format!("{path}: index {index} out of range ({len})")))
}

/// Turn scalars and nulls into an empty object so children can be attached.
fn ensure_object(node: &mut Value) -> PollResult<&mut Map<String, Value>> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut()
        .ok_or_else(|| PollError::invalid("expected an object node"))
}

//! Dot-addressable key-value store holding the session payload.
//!
//! A path such as `user.profile.name` addresses the nested mapping
//! `{"user": {"profile": {"name": ..}}}`. Reads may also step into sequences
//! with a numeric segment (`tags.0`), and deletes may remove sequence
//! elements the same way; writes only ever create mappings.

use serde_json::{Map, Value};

use super::errors::KeyStoreError;

const PATH_SEPARATOR: char = '.';

/// Ordered mapping of session data for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyStore {
    entries: Map<String, Value>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Returns the value at `path`, if any.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        segments.try_fold(self.entries.get(first)?, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Stores `value` at `path`, replacing any non-mapping value found along the way.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        set_in(&mut self.entries, &segments, value);
    }

    /// Removes the value at `path` and returns it.
    ///
    /// A numeric segment removes a sequence element. Parents left empty by the
    /// removal are removed as well.
    pub fn delete(&mut self, path: &str) -> Option<Value> {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        delete_in(&mut self.entries, &segments)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Serializes the store into the payload string handed to a save handler.
    pub fn encode(&self) -> Result<String, KeyStoreError> {
        serde_json::to_string(&self.entries).map_err(|e| KeyStoreError::Encode(e.to_string()))
    }

    /// Parses a payload read from a save handler. An empty payload yields an empty store.
    pub fn decode(payload: &str) -> Result<Self, KeyStoreError> {
        if payload.trim().is_empty() {
            return Ok(Self::new());
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(entries)) => Ok(Self { entries }),
            Ok(other) => Err(KeyStoreError::Decode(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
            Err(e) => Err(KeyStoreError::Decode(e.to_string())),
        }
    }
}

fn set_in(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert((*first).to_string(), value);
        return;
    }

    let entry = map
        .entry((*first).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(child) = entry {
        set_in(child, rest, value);
    }
}

fn delete_in(map: &mut Map<String, Value>, segments: &[&str]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;

    if rest.is_empty() {
        return map.shift_remove(*first);
    }

    let child = map.get_mut(*first)?;
    let removed = delete_in_value(child, rest);

    if removed.is_some() && is_empty_container(child) {
        map.shift_remove(*first);
    }
    removed
}

/// Sequence elements left empty are kept so later indices do not shift.
fn delete_in_value(value: &mut Value, segments: &[&str]) -> Option<Value> {
    match value {
        Value::Object(map) => delete_in(map, segments),
        Value::Array(items) => {
            let (first, rest) = segments.split_first()?;
            let index = first.parse::<usize>().ok().filter(|i| *i < items.len())?;
            if rest.is_empty() {
                Some(items.remove(index))
            } else {
                delete_in_value(&mut items[index], rest)
            }
        }
        _ => None,
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Catch-all bag for document fields with no dedicated column.
///
/// Backed by a `BTreeMap`, so the JSON encoding always lists keys in
/// sorted order and equal maps encode to equal strings. The blob is
/// stored in a single column and [`MetaMap::from_json`] reconstructs the
/// original attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaMap(BTreeMap<String, Value>);

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Canonical encoding: compact JSON with sorted keys.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(&self.0).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        serde_json::from_str(input).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MetaMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

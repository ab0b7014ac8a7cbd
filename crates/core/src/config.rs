//! Per-command attribute bag
//!
//! A [`CommandConfig`] is a flat JSON object. The engine only interprets two
//! keys, [`AUTHORITY`] and [`PATCH`]; everything else belongs to extensions
//! (permission checks, help rendering, rate limits, ...).
//!
//! Merging is a shallow key overwrite: nested objects are replaced, not
//! merged recursively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the inherited access level
pub const AUTHORITY: &str = "authority";

/// Key requesting a transient (patch) registration
pub const PATCH: &str = "patch";

/// Mutable attribute bag attached to every command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandConfig(Map<String, Value>);

impl CommandConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder: set the authority level
    pub fn with_authority(mut self, authority: u32) -> Self {
        self.set_authority(authority);
        self
    }

    /// Builder: request a patch registration
    pub fn with_patch(mut self, patch: bool) -> Self {
        self.0.insert(PATCH.to_string(), Value::Bool(patch));
        self
    }

    /// Builder: set an arbitrary key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Authority level, if set and representable as `u32`
    pub fn authority(&self) -> Option<u32> {
        self.0
            .get(AUTHORITY)
            .and_then(Value::as_u64)
            .and_then(|a| u32::try_from(a).ok())
    }

    /// Set the authority level
    pub fn set_authority(&mut self, authority: u32) {
        self.0.insert(AUTHORITY.to_string(), Value::from(authority));
    }

    /// Whether this config requests a patch registration
    pub fn patch(&self) -> bool {
        self.0.get(PATCH).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Shallow merge: every key of `other` overwrites the same key here
    pub fn merge(&mut self, other: &CommandConfig) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys and values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for CommandConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

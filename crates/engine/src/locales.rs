//! Localized text collaborator
//!
//! The engine stores command descriptions through [`Locales`] rather than on
//! the node, so translations can be swapped without touching the tree.
//! [`MemoryLocales`] is the default in-process store.
//!
//! Patch registrations override a description only while they live.
//! [`DescriptionLayers`] keeps the overrides of each key in a stack above
//! the base text, so patches can be torn down in any order.

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key-value store of localized strings
pub trait Locales: Send + Sync {
    /// Define `key` in `locale`, replacing any previous value
    fn define(&self, locale: &str, key: &str, value: &str);

    /// Look up `key` in `locale`
    fn get(&self, locale: &str, key: &str) -> Option<String>;

    /// Remove `key` from `locale`, returning the old value
    fn remove(&self, locale: &str, key: &str) -> Option<String>;
}

/// In-memory [`Locales`] backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryLocales {
    entries: DashMap<(String, String), String>,
}

impl MemoryLocales {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of defined strings across all locales
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Locales for MemoryLocales {
    fn define(&self, locale: &str, key: &str, value: &str) {
        self.entries
            .insert((locale.to_string(), key.to_string()), value.to_string());
    }

    fn get(&self, locale: &str, key: &str) -> Option<String> {
        self.entries
            .get(&(locale.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn remove(&self, locale: &str, key: &str) -> Option<String> {
        self.entries
            .remove(&(locale.to_string(), key.to_string()))
            .map(|(_, value)| value)
    }
}

/// Identifies one override pushed onto [`DescriptionLayers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LayerId(u64);

struct Layered {
    base: Option<String>,
    stack: Vec<(LayerId, String)>,
}

/// Stacked description overrides, keyed by `(locale, key)`
///
/// The store always holds the topmost override, or the base text once the
/// last override is gone. Base text defined while overrides are active is
/// remembered and shows up when they are all removed.
#[derive(Default)]
pub(crate) struct DescriptionLayers {
    next_id: AtomicU64,
    layers: Mutex<FxHashMap<(String, String), Layered>>,
}

impl DescriptionLayers {
    /// Define the base text of `key`
    pub(crate) fn define_base(&self, locales: &dyn Locales, locale: &str, key: &str, text: &str) {
        let mut layers = self.layers.lock();
        match layers.get_mut(&(locale.to_string(), key.to_string())) {
            Some(layered) => layered.base = Some(text.to_string()),
            None => locales.define(locale, key, text),
        }
    }

    /// Override `key` until the returned layer is popped
    pub(crate) fn push(&self, locales: &dyn Locales, locale: &str, key: &str, text: &str) -> LayerId {
        let id = LayerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut layers = self.layers.lock();
        let layered = layers
            .entry((locale.to_string(), key.to_string()))
            .or_insert_with(|| Layered {
                base: locales.get(locale, key),
                stack: Vec::new(),
            });
        layered.stack.push((id, text.to_string()));
        locales.define(locale, key, text);
        id
    }

    /// Remove one override and re-expose whatever is now on top
    pub(crate) fn pop(&self, locales: &dyn Locales, locale: &str, key: &str, id: LayerId) {
        let slot = (locale.to_string(), key.to_string());
        let mut layers = self.layers.lock();
        let Some(layered) = layers.get_mut(&slot) else {
            return;
        };
        layered.stack.retain(|(layer, _)| *layer != id);
        if let Some((_, text)) = layered.stack.last() {
            locales.define(locale, key, text);
            return;
        }
        match layered.base.take() {
            Some(base) => locales.define(locale, key, &base),
            None => {
                locales.remove(locale, key);
            }
        }
        layers.remove(&slot);
    }
}

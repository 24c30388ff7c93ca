//! Per-category item collections.
//!
//! Each [`ContextCategory`] owns a map from item id to item. Entries carry a
//! registry-wide insertion sequence number so the aggregator can break
//! timestamp ties by insertion order. Overwriting an id keeps its original
//! sequence number.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{ContextCategory, ContextItem};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    item: ContextItem,
}

/// One mapping per category, keyed by item id.
///
/// The registry performs no notification; [`ContextStore`](super::ContextStore)
/// layers subscriptions and the current-file slot on top of it.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    collections: HashMap<ContextCategory, HashMap<String, Entry>>,
    next_seq: u64,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `item` in its category's collection.
    ///
    /// Returns the item it replaced, if any. Overwrites replace the whole
    /// item; fields are never merged. An empty id is stored like any other.
    pub fn add(&mut self, item: ContextItem) -> Option<ContextItem> {
        let category = item.category();
        if item.id.is_empty() {
            warn!(%category, "storing context item with empty id");
        }

        let collection = self.collections.entry(category).or_default();
        match collection.get_mut(&item.id) {
            Some(entry) => {
                debug!(%category, id = %item.id, "replacing context item");
                Some(std::mem::replace(&mut entry.item, item))
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                debug!(%category, id = %item.id, seq, "adding context item");
                collection.insert(item.id.clone(), Entry { seq, item });
                None
            }
        }
    }

    pub fn contains(&self, category: ContextCategory, id: &str) -> bool {
        self.get(category, id).is_some()
    }

    /// Remove an item. Unknown ids are a no-op and return `None`.
    pub fn remove(&mut self, category: ContextCategory, id: &str) -> Option<ContextItem> {
        let removed = self
            .collections
            .get_mut(&category)
            .and_then(|c| c.remove(id))
            .map(|e| e.item);
        if removed.is_some() {
            debug!(%category, id, "removed context item");
        }
        removed
    }

    pub fn get(&self, category: ContextCategory, id: &str) -> Option<&ContextItem> {
        self.collections
            .get(&category)
            .and_then(|c| c.get(id))
            .map(|e| &e.item)
    }

    /// All items of one category, in insertion order.
    pub fn get_by_category(&self, category: ContextCategory) -> Vec<ContextItem> {
        let Some(collection) = self.collections.get(&category) else {
            return Vec::new();
        };
        let mut entries: Vec<&Entry> = collection.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.item.clone()).collect()
    }

    pub fn count(&self, category: ContextCategory) -> usize {
        self.collections.get(&category).map_or(0, |c| c.len())
    }

    pub fn len(&self) -> usize {
        self.collections.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every category collection.
    pub fn clear(&mut self) {
        for collection in self.collections.values_mut() {
            collection.clear();
        }
    }

    /// Every stored item paired with its insertion sequence number.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &ContextItem)> {
        self.collections
            .values()
            .flat_map(|c| c.values())
            .map(|e| (e.seq, &e.item))
    }
}

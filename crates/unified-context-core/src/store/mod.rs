//! The unified context store.
//!
//! [`ContextStore`] combines the [`ItemRegistry`], the current-file slot
//! and its inclusion flag, and a list of subscribers. It is an explicitly
//! constructed value: create one per session and pass it by reference to
//! whatever needs it.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`add_item`](ContextStore::add_item) | Insert or overwrite an item in its category |
//! | [`remove_item`](ContextStore::remove_item) | Remove by category + id (no-op if absent) |
//! | [`get_items_by_type`](ContextStore::get_items_by_type) | Raw items of one category |
//! | [`unified_context`](ContextStore::unified_context) | Ordered view of everything |
//! | [`set_current_file`](ContextStore::set_current_file) | Replace the current-file slot |
//! | [`toggle_current_file`](ContextStore::toggle_current_file) | Flip the inclusion flag |
//! | [`clear_all`](ContextStore::clear_all) | Empty everything and reset the slot |
//! | [`subscribe`](ContextStore::subscribe) | Observe the unified view after each mutation |
//!
//! Factory helpers (`add_file`, `add_tag`, …) live in [`crate::factory`].
//!
//! Registry and slot sit behind one `RwLock`, so a store can be shared
//! across threads. Subscribers run after the state lock is released and may
//! read the store from inside the callback, but must not mutate it.
//! Notifications are serialized: every subscriber sees snapshots in the
//! order the mutations were applied. No operation returns an error.

mod registry;

pub use registry::ItemRegistry;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, warn};

use crate::aggregate;
use crate::clock::{Clock, SystemClock};
use crate::models::{ContextCategory, ContextItem};

/// Callback invoked with the fresh unified context after every mutation.
pub type Listener = Arc<dyn Fn(&[ContextItem]) + Send + Sync>;

/// Handle returned by [`ContextStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreState {
    registry: ItemRegistry,
    current_file: Option<ContextItem>,
    include_current_file: bool,
}

impl StoreState {
    fn new() -> Self {
        Self {
            registry: ItemRegistry::new(),
            current_file: None,
            include_current_file: true,
        }
    }

    fn unified(&self) -> Vec<ContextItem> {
        let current = self
            .current_file
            .as_ref()
            .filter(|_| self.include_current_file);
        aggregate::unify(&self.registry, current)
    }
}

/// In-process container of context items for one session.
pub struct ContextStore {
    state: RwLock<StoreState>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    notify: Mutex<()>,
    next_subscription: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl ContextStore {
    /// Empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store stamped by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(StoreState::new()),
            listeners: RwLock::new(Vec::new()),
            notify: Mutex::new(()),
            next_subscription: AtomicU64::new(0),
            clock,
        }
    }

    /// The time source used by the factory helpers.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the write lock, then notify subscribers outside it.
    ///
    /// The notify mutex is held from before the mutation until the last
    /// listener returns, so snapshots are delivered in mutation order.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let _notify = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        let (result, snapshot) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let result = f(&mut state);
            let snapshot = if listeners.is_empty() {
                Vec::new()
            } else {
                state.unified()
            };
            (result, snapshot)
        };

        for listener in &listeners {
            listener(&snapshot);
        }
        result
    }

    // ─── Item registry ──────────────────────────────────────────────

    /// Insert or overwrite an item in its category.
    ///
    /// Returns the item it replaced, if any.
    pub fn add_item(&self, item: ContextItem) -> Option<ContextItem> {
        self.mutate(|s| s.registry.add(item))
    }

    /// Insert `item`, suffixing its id (`-1`, `-2`, …) until it no longer
    /// collides with an existing entry. Returns the item as stored.
    pub(crate) fn add_item_with_fresh_id(&self, mut item: ContextItem) -> ContextItem {
        self.mutate(|s| {
            let category = item.category();
            let base = item.id.clone();
            let mut suffix = 1;
            while s.registry.contains(category, &item.id) {
                item.id = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            s.registry.add(item.clone());
            item
        })
    }

    /// Remove an item by category and id. Absent ids are a no-op.
    pub fn remove_item(&self, category: ContextCategory, id: &str) -> Option<ContextItem> {
        self.mutate(|s| s.registry.remove(category, id))
    }

    pub fn get_item(&self, category: ContextCategory, id: &str) -> Option<ContextItem> {
        self.read().registry.get(category, id).cloned()
    }

    /// Raw items of one category, not sorted by time.
    pub fn get_items_by_type(&self, category: ContextCategory) -> Vec<ContextItem> {
        self.read().registry.get_by_category(category)
    }

    /// Number of items across all categories, excluding the current-file slot.
    pub fn len(&self) -> usize {
        self.read().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ─── Current-file slot ──────────────────────────────────────────

    /// Replace the current-file slot. `None` clears it.
    ///
    /// Only File items are accepted; anything else leaves the slot untouched
    /// and returns `false`.
    pub fn set_current_file(&self, file: Option<ContextItem>) -> bool {
        if let Some(item) = &file {
            if !item.is_file() {
                warn!(
                    category = %item.category(),
                    id = %item.id,
                    "current file must be a file item; ignoring"
                );
                return false;
            }
        }
        self.mutate(|s| {
            debug!(
                id = file.as_ref().map(|f| f.id.as_str()).unwrap_or("<none>"),
                "setting current file"
            );
            s.current_file = file;
        });
        true
    }

    pub fn current_file(&self) -> Option<ContextItem> {
        self.read().current_file.clone()
    }

    pub fn include_current_file(&self) -> bool {
        self.read().include_current_file
    }

    /// Flip the inclusion flag and return its new value.
    pub fn toggle_current_file(&self) -> bool {
        self.mutate(|s| {
            s.include_current_file = !s.include_current_file;
            debug!(include = s.include_current_file, "toggled current file");
            s.include_current_file
        })
    }

    // ─── Aggregate ──────────────────────────────────────────────────

    /// The ordered list handed to the prompt builder.
    ///
    /// Most recent first; the current file (when set and included) leads.
    pub fn unified_context(&self) -> Vec<ContextItem> {
        self.read().unified()
    }

    /// Empty every collection, clear the slot, and re-enable inclusion.
    pub fn clear_all(&self) {
        self.mutate(|s| {
            s.registry.clear();
            s.current_file = None;
            s.include_current_file = true;
            debug!("cleared context store");
        });
    }

    // ─── Subscriptions ──────────────────────────────────────────────

    /// Register a listener called with the unified context after each mutation.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[ContextItem]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::AtomicUsize;

    fn store_at(start: i64) -> (Arc<ManualClock>, ContextStore) {
        let clock = Arc::new(ManualClock::new(start));
        let store = ContextStore::with_clock(clock.clone());
        (clock, store)
    }

    fn ids(items: &[ContextItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_defaults() {
        let store = ContextStore::new();
        assert!(store.is_empty());
        assert!(store.current_file().is_none());
        assert!(store.include_current_file());
        assert!(store.unified_context().is_empty());
    }

    #[test]
    fn test_scenario_ordering_and_current_file() {
        let store = ContextStore::new();
        store.add_item(ContextItem::file("a.md", "A", "", 100));
        store.add_item(ContextItem::tag("x", 200));
        store.add_item(ContextItem::file("b.md", "B", "", 150));

        assert_eq!(
            ids(&store.unified_context()),
            vec!["tag-x", "b.md", "a.md"]
        );

        assert!(store.set_current_file(Some(ContextItem::file("c.md", "C", "", 50))));
        assert_eq!(
            ids(&store.unified_context()),
            vec!["c.md", "tag-x", "b.md", "a.md"]
        );
    }

    #[test]
    fn test_newer_precedes_older() {
        let (clock, store) = store_at(1_000);
        store.add_file("old.md", "Old", "");
        clock.advance(1);
        store.add_tag("new");

        let unified = store.unified_context();
        assert_eq!(ids(&unified), vec!["tag-new", "old.md"]);
        assert!(unified[0].created_at > unified[1].created_at);
    }

    #[test]
    fn test_same_id_replaces() {
        let (clock, store) = store_at(0);
        store.add_file("a.md", "A", "first");
        clock.advance(10);
        store.add_file("a.md", "A", "second");

        let unified = store.unified_context();
        assert_eq!(unified.iter().filter(|i| i.id == "a.md").count(), 1);
        match &unified[0].kind {
            crate::models::ContextKind::File { content, .. } => assert_eq!(content, "second"),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_twice_restores_flag() {
        let store = ContextStore::new();
        let original = store.include_current_file();
        assert_eq!(store.toggle_current_file(), !original);
        assert_eq!(store.toggle_current_file(), original);
        assert_eq!(store.include_current_file(), original);
    }

    #[test]
    fn test_excluded_current_file_is_omitted() {
        let store = ContextStore::new();
        store.add_item(ContextItem::tag("x", 10));
        store.set_current_file(Some(ContextItem::file("c.md", "C", "", 99)));
        store.toggle_current_file();

        assert_eq!(ids(&store.unified_context()), vec!["tag-x"]);
        assert!(store.current_file().is_some());
    }

    #[test]
    fn test_set_current_file_none_clears() {
        let store = ContextStore::new();
        store.set_current_file(Some(ContextItem::file("c.md", "C", "", 1)));
        store.set_current_file(None);
        assert!(store.current_file().is_none());
        assert!(store.unified_context().is_empty());
    }

    #[test]
    fn test_non_file_current_file_rejected() {
        let store = ContextStore::new();
        store.set_current_file(Some(ContextItem::file("c.md", "C", "", 1)));
        assert!(!store.set_current_file(Some(ContextItem::tag("x", 2))));
        assert_eq!(store.current_file().map(|f| f.id), Some("c.md".to_string()));
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let store = ContextStore::new();
        store.add_item(ContextItem::tag("x", 1));
        store.add_item(ContextItem::folder("notes", 2));
        store.set_current_file(Some(ContextItem::file("c.md", "C", "", 3)));
        store.toggle_current_file();

        store.clear_all();
        assert!(store.unified_context().is_empty());
        assert!(store.current_file().is_none());
        assert!(store.include_current_file());
    }

    #[test]
    fn test_remove_missing_leaves_others_unchanged() {
        let store = ContextStore::new();
        store.add_item(ContextItem::file("a.md", "A", "", 1));
        store.add_item(ContextItem::folder("notes", 2));
        let before = store.unified_context();

        assert!(store.remove_item(ContextCategory::Tag, "tag-x").is_none());
        assert_eq!(store.unified_context(), before);
    }

    #[test]
    fn test_remove_existing() {
        let store = ContextStore::new();
        store.add_item(ContextItem::tag("x", 1));
        let removed = store.remove_item(ContextCategory::Tag, "tag-x");
        assert_eq!(removed.map(|i| i.id), Some("tag-x".to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_items_by_type_only_returns_category() {
        let store = ContextStore::new();
        store.add_item(ContextItem::tag("a", 5));
        store.add_item(ContextItem::file("a.md", "A", "", 6));
        store.add_item(ContextItem::tag("b", 1));

        let tags = store.get_items_by_type(ContextCategory::Tag);
        assert_eq!(ids(&tags), vec!["tag-a", "tag-b"]);
        assert!(store.get_items_by_type(ContextCategory::Search).is_empty());
    }

    #[test]
    fn test_subscribers_notified_on_each_mutation() {
        let store = ContextStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let last_len = Arc::new(AtomicUsize::new(usize::MAX));
        let (c, l) = (calls.clone(), last_len.clone());
        let id = store.subscribe(move |items| {
            c.fetch_add(1, Ordering::SeqCst);
            l.store(items.len(), Ordering::SeqCst);
        });

        store.add_item(ContextItem::tag("x", 1));
        store.set_current_file(Some(ContextItem::file("c.md", "C", "", 2)));
        store.toggle_current_file();
        store.remove_item(ContextCategory::Tag, "missing");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(last_len.load(Ordering::SeqCst), 1);

        store.clear_all();
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(last_len.load(Ordering::SeqCst), 0);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_item(ContextItem::tag("y", 3));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_add_item_returns_replaced() {
        let store = ContextStore::new();
        assert!(store.add_item(ContextItem::tag("x", 1)).is_none());
        let replaced = store.add_item(ContextItem::tag("x", 2));
        assert_eq!(replaced.map(|i| i.created_at), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_path_file_is_kept() {
        let store = ContextStore::new();
        let item = store.add_file("", "", "");
        assert_eq!(item.id, "");
        assert_eq!(store.unified_context().len(), 1);
        assert!(store.get_item(ContextCategory::File, "").is_some());

        store.add_folder("");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_notifications_arrive_in_mutation_order() {
        let store = Arc::new(ContextStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        store.subscribe(move |items| {
            s.lock().unwrap().push(items.len());
        });

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.add_item(ContextItem::tag(&format!("{}-{}", t, i), i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, (1..=100).collect::<Vec<usize>>());
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = Arc::new(ContextStore::new());
        let seen = Arc::new(AtomicUsize::new(0));
        let (inner, s) = (Arc::downgrade(&store), seen.clone());
        store.subscribe(move |_| {
            if let Some(store) = inner.upgrade() {
                s.store(store.len(), Ordering::SeqCst);
            }
        });

        store.add_item(ContextItem::tag("x", 1));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let store = Arc::new(ContextStore::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.add_item(ContextItem::tag(&format!("{}-{}", t, i), i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 100);
    }
}

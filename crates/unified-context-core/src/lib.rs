//! # Unified Context Core
//!
//! Shared, WASM-safe logic for Unified Context: context item models, the
//! per-category item registry, the current-file slot, the aggregator that
//! produces the unified view, factory helpers, and prompt rendering.
//!
//! This crate contains no filesystem I/O, no async runtime, and no
//! process-level dependencies. It compiles to both native targets and
//! `wasm32-unknown-unknown`.
//!
//! ```rust
//! use unified_context_core::clock::ManualClock;
//! use unified_context_core::store::ContextStore;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(100));
//! let store = ContextStore::with_clock(clock.clone());
//! store.add_file("a.md", "A", "alpha");
//! clock.advance(50);
//! store.add_tag("x");
//!
//! let ids: Vec<_> = store.unified_context().into_iter().map(|i| i.id).collect();
//! assert_eq!(ids, vec!["tag-x", "a.md"]);
//! ```

pub mod aggregate;
pub mod clock;
pub mod factory;
pub mod models;
pub mod render;
pub mod store;

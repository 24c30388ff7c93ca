//! Unified view across all context categories.
//!
//! # Ordering
//!
//! 1. Collect every item from every category collection.
//! 2. Sort by `created_at` (desc); ties keep registry insertion order.
//! 3. Prepend the current file, if one is given, regardless of its timestamp.
//!
//! The result is a fresh `Vec`; it does not track later mutations.

use crate::models::ContextItem;
use crate::store::ItemRegistry;

/// Order `(seq, item)` pairs most-recent first, breaking ties by `seq`.
pub fn order_by_recency<'a, I>(entries: I) -> Vec<ContextItem>
where
    I: IntoIterator<Item = (u64, &'a ContextItem)>,
{
    let mut ordered: Vec<(u64, &ContextItem)> = entries.into_iter().collect();
    ordered.sort_by(|(seq_a, a), (seq_b, b)| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| seq_a.cmp(seq_b))
    });
    ordered.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Materialize the unified context.
///
/// `current_file` must already reflect the inclusion flag: pass `None` when
/// the slot is empty or excluded.
pub fn unify(registry: &ItemRegistry, current_file: Option<&ContextItem>) -> Vec<ContextItem> {
    let mut unified = Vec::with_capacity(registry.len() + 1);
    if let Some(file) = current_file {
        unified.push(file.clone());
    }
    unified.extend(order_by_recency(registry.entries()));
    unified
}

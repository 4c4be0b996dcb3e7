//! crates/pokedex_core/src/query.rs
//!
//! The list-query pipeline: filter, then sort, then paginate.
//!
//! The upstream index supports none of these operations, so every list request
//! runs the full sequence over the normalized summaries. All functions here are
//! pure and deterministic.

use std::cmp::Ordering;

use crate::domain::{EntitySummary, Page, QuerySpec, SortField, SortOrder};

/// Produces one page of results for `spec`. The input slice is left untouched.
///
/// Assumes `spec` was built through [`QuerySpec::new`], so `limit >= 1`.
pub fn paginate(items: &[EntitySummary], spec: &QuerySpec) -> Page<EntitySummary> {
    // --- 1. Filter ---
    let mut matched: Vec<&EntitySummary> = match normalized_text(spec.text.as_deref()) {
        Some(needle) => items.iter().filter(|item| matches_text(item, &needle)).collect(),
        None => items.iter().collect(),
    };

    // --- 2. Sort ---
    if let Some(field) = spec.sort_field {
        // `sort_by` is stable, so equal keys keep their upstream order.
        matched.sort_by(|a, b| {
            let ordering = match field {
                SortField::Name => compare_names(&a.name, &b.name),
                SortField::Number => a.id.cmp(&b.id),
            };
            match spec.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    // --- 3. Paginate ---
    let total_count = matched.len();
    let start = spec.offset.min(total_count);
    let end = spec.offset.saturating_add(spec.limit).min(total_count);
    let items = matched[start..end].iter().map(|item| (*item).clone()).collect();

    Page {
        items,
        total_count,
        has_next: spec.offset.saturating_add(spec.limit) < total_count,
        has_previous: spec.offset > 0,
    }
}

/// Lowercased, trimmed search text, or `None` when there is nothing to filter by.
fn normalized_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn matches_text(item: &EntitySummary, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle) || item.id.to_string().contains(needle)
}

/// Locale-style name ordering: letters compare case-insensitively first, then
/// lowercase sorts before uppercase, then raw code points decide.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

//! Update batch computation.

use std::collections::HashMap;

use crate::domain::{BatchPolicy, OrderUpdate};

/// Records to persist, given the touched sibling sets before and after an
/// operation. `after` keeps its positional order.
pub fn compute_batch(
    before: &[OrderUpdate],
    after: Vec<OrderUpdate>,
    policy: BatchPolicy,
) -> Vec<OrderUpdate> {
    if before == after.as_slice() {
        return Vec::new();
    }

    match policy {
        BatchPolicy::TouchedGroups => after,
        BatchPolicy::Minimal => {
            let previous: HashMap<&str, &OrderUpdate> =
                before.iter().map(|record| (record.id.as_str(), record)).collect();
            after
                .into_iter()
                .filter(|record| {
                    previous
                        .get(record.id.as_str())
                        .map_or(true, |old| *old != record)
                })
                .collect()
        }
    }
}

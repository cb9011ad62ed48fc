//! FILENAME: core/drill-engine/src/aggregate.rs
//! Aggregator - groups dataset rows by one dimension column.
//!
//! Algorithm:
//! 1. Resolve the dimension per row (as-typed / UPPER / lower alias probe)
//! 2. Trim; blank values bucket under "Unknown"
//! 3. Accumulate running totals per key, in first-seen order
//! 4. Stable-sort groups by total cost, descending
//!
//! The descending order is load-bearing: it decides which rows render
//! first and which group's total scales the performance bars.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::fields::{resolve_field, Field, Record};
use crate::parse::{count_device, parse_currency};

/// Index of a row within the loaded dataset.
pub type RowId = usize;

/// Bucket for rows with no usable value in the dimension column.
pub const UNKNOWN_KEY: &str = "Unknown";

// ============================================================================
// GROUP
// ============================================================================

/// The aggregated result for one distinct dimension value.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Resolved, trimmed dimension value ("Unknown" if absent).
    pub key: String,
    /// Member row count. Always equals `members.len()`.
    pub count: usize,
    /// Members whose IMEI field is non-blank.
    pub device_count: usize,
    /// Sum of the parsed cost field across members.
    pub total_cost: f64,
    /// Distinct "Days" values seen in the group.
    pub day_set: BTreeSet<String>,
    /// Member rows, in source order.
    pub members: Vec<RowId>,
}

impl Group {
    fn new(key: &str) -> Self {
        Group {
            key: key.to_string(),
            count: 0,
            device_count: 0,
            total_cost: 0.0,
            day_set: BTreeSet::new(),
            members: Vec::new(),
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Aggregates every dataset row. See [`aggregate_rows`].
pub fn aggregate(dataset: &[Record], dimension: &str) -> Vec<Group> {
    let rows: Vec<RowId> = (0..dataset.len()).collect();
    aggregate_rows(dataset, &rows, dimension)
}

/// Aggregates the given rows of `dataset` by `dimension`.
///
/// Groups partition the input exactly: every row lands in one group, none
/// are dropped. Output is sorted by `total_cost` descending; equal totals
/// keep the first-encounter order of their keys (`Vec::sort_by` is stable).
pub fn aggregate_rows(dataset: &[Record], rows: &[RowId], dimension: &str) -> Vec<Group> {
    let upper = dimension.to_uppercase();
    let lower = dimension.to_lowercase();
    let aliases = [dimension, upper.as_str(), lower.as_str()];

    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<Group> = Vec::new();

    for &row in rows {
        let Some(record) = dataset.get(row) else {
            continue;
        };
        let value = resolve_field(record, &aliases).trim();
        let key = if value.is_empty() { UNKNOWN_KEY } else { value };

        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            groups.push(Group::new(key));
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.device_count += count_device(record) as usize;
        group.total_cost += parse_currency(Field::Cost.resolve(record));
        group.members.push(row);

        let day = Field::Days.resolve(record).trim();
        if !day.is_empty() {
            group.day_set.insert(day.to_string());
        }
    }

    groups.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    groups
}

/// Largest total cost at a level, floored at 1 so bar scaling never
/// divides by zero when every cost is zero.
pub fn max_cost(groups: &[Group]) -> f64 {
    groups.iter().map(|g| g.total_cost).fold(1.0_f64, f64::max)
}

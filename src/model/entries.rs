use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of tracked days in the period
pub const TRACKED_DAYS: u32 = 30;

/// The storage key for a tracked day (`day-1` .. `day-30`)
pub fn day_key(day: u32) -> String {
    format!("day-{}", day)
}

/// Sparse per-day completion flags: day key → item id → `true`.
///
/// Only completed flags are stored and a day with no completed items has no
/// key at all. Key order is insertion order so documents round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries(IndexMap<String, IndexMap<String, bool>>);

impl Entries {
    pub fn new() -> Self {
        Entries(IndexMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `item_id` was completed on `day`
    pub fn is_checked(&self, day: u32, item_id: &str) -> bool {
        self.0
            .get(&day_key(day))
            .and_then(|d| d.get(item_id))
            .copied()
            .unwrap_or(false)
    }

    /// Mark `item_id` completed on `day`
    pub fn check(&mut self, day: u32, item_id: &str) {
        self.0
            .entry(day_key(day))
            .or_default()
            .insert(item_id.to_string(), true);
    }

    /// Clear `item_id` on `day`, dropping the day when it becomes empty
    pub fn uncheck(&mut self, day: u32, item_id: &str) {
        let key = day_key(day);
        if let Some(day_map) = self.0.get_mut(&key) {
            day_map.shift_remove(item_id);
            if day_map.is_empty() {
                self.0.shift_remove(&key);
            }
        }
    }

    /// Iterate over (day key, completed item ids) in stored order
    pub fn days(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = &str>)> {
        self.0.iter().map(|(day, items)| {
            (
                day.as_str(),
                items
                    .iter()
                    .filter(|(_, done)| **done)
                    .map(|(id, _)| id.as_str()),
            )
        })
    }

    /// Completed item ids for the given day key
    pub fn checked_on(&self, key: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(key)
            .into_iter()
            .flat_map(|d| d.iter().filter(|(_, done)| **done).map(|(id, _)| id.as_str()))
    }

    /// Drop flags for items not in `valid`, then prune emptied days
    pub fn retain_items(&mut self, valid: &HashSet<&str>) {
        for day_map in self.0.values_mut() {
            day_map.retain(|id, _| valid.contains(id.as_str()));
        }
        self.0.retain(|_, day_map| !day_map.is_empty());
    }

    /// Re-establish sparsity: drop `false` flags and empty days
    pub fn normalize(&mut self) {
        for day_map in self.0.values_mut() {
            day_map.retain(|_, done| *done);
        }
        self.0.retain(|_, day_map| !day_map.is_empty());
    }
}

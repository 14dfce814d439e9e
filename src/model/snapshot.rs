use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::Category;
use super::defaults::{default_categories, default_items};
use super::entries::Entries;
use super::item::Item;

/// The full tracker state for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerData {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub entries: Entries,
}

impl Default for TrackerData {
    /// The built-in checklist with no completions
    fn default() -> Self {
        TrackerData {
            categories: default_categories(),
            items: default_items(),
            entries: Entries::new(),
        }
    }
}

impl TrackerData {
    /// An empty snapshot (no categories, items or entries)
    pub fn empty() -> Self {
        TrackerData {
            categories: Vec::new(),
            items: Vec::new(),
            entries: Entries::new(),
        }
    }

    /// Accept a parsed document as a snapshot.
    ///
    /// The document must be an object with `categories` and `items` arrays
    /// and an `entries` object, and must then deserialize as a whole. Nothing
    /// is repaired: any failure rejects the document.
    pub fn from_value(value: Value) -> Option<TrackerData> {
        if !has_snapshot_shape(&value) {
            return None;
        }
        let mut data: TrackerData = serde_json::from_value(value).ok()?;
        data.entries.normalize();
        Some(data)
    }

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Option<TrackerData> {
        let value: Value = serde_json::from_str(text).ok()?;
        TrackerData::from_value(value)
    }

    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Top-level shape check shared by the load and import paths
pub fn has_snapshot_shape(value: &Value) -> bool {
    matches!(value.get("categories"), Some(Value::Array(_)))
        && matches!(value.get("items"), Some(Value::Array(_)))
        && matches!(value.get("entries"), Some(Value::Object(_)))
}

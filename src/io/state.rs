use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::io::storage::{Storage, StorageError};

pub const VIEW_STATE_KEY: &str = "view-state";

/// Per-machine display state (written under `view-state`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Category id → collapsed
    #[serde(default)]
    pub collapsed: BTreeMap<String, bool>,
}

impl ViewState {
    pub fn is_collapsed(&self, category_id: &str) -> bool {
        self.collapsed.get(category_id).copied().unwrap_or(false)
    }

    /// Flip a category's collapsed flag. Returns the new value.
    pub fn toggle_collapsed(&mut self, category_id: &str) -> bool {
        let next = !self.is_collapsed(category_id);
        if next {
            self.collapsed.insert(category_id.to_string(), true);
        } else {
            self.collapsed.remove(category_id);
        }
        next
    }

    /// Forget categories that no longer exist
    pub fn retain_categories(&mut self, mut exists: impl FnMut(&str) -> bool) {
        self.collapsed.retain(|id, _| exists(id));
    }
}

/// Read the view state. Missing, unreadable or malformed state is empty.
pub fn read_view_state(storage: &impl Storage) -> ViewState {
    storage
        .get(VIEW_STATE_KEY)
        .ok()
        .flatten()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn write_view_state(storage: &mut impl Storage, state: &ViewState) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(state)?;
    storage.set(VIEW_STATE_KEY, &content)
}

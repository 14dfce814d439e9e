use std::collections::HashSet;

use crate::model::category::{Category, Color};
use crate::model::defaults::{
    default_categories, default_items, NEW_CATEGORY_COLOR, NEW_CATEGORY_NAME, NEW_ITEM_NAME,
    NEW_SUB_ITEM_NAME,
};
use crate::model::item::Item;
use crate::model::snapshot::TrackerData;
use crate::ops::ids;
use crate::ops::tree;

/// Error type for committing an edit session
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("category {0} has an empty name")]
    EmptyCategoryName(String),
    #[error("item {0} has an empty name")]
    EmptyItemName(String),
}

/// Partial update for a category
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<Color>,
}

// ---------------------------------------------------------------------------
// Reset confirmation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ResetState {
    #[default]
    Idle,
    Armed,
}

/// What a reset request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// First request: waiting for confirmation
    Armed,
    /// Second request: defaults restored
    Reset,
}

/// Two-step confirmation: Idle → Armed → (reset) → Idle.
/// `cancel` returns to Idle from either state.
#[derive(Debug, Clone, Default)]
pub struct ResetGuard {
    state: ResetState,
}

impl ResetGuard {
    /// Advance the machine. Returns true when the reset should happen now.
    pub fn request(&mut self) -> bool {
        match self.state {
            ResetState::Idle => {
                self.state = ResetState::Armed;
                false
            }
            ResetState::Armed => {
                self.state = ResetState::Idle;
                true
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = ResetState::Idle;
    }
}

// ---------------------------------------------------------------------------
// Edit session
// ---------------------------------------------------------------------------

/// A working copy of a snapshot's categories and items.
///
/// Nothing here touches storage. Dropping the session discards every change;
/// `save` produces the snapshot to persist.
#[derive(Debug, Clone)]
pub struct EditSession {
    categories: Vec<Category>,
    items: Vec<Item>,
    original_categories: Vec<Category>,
    original_items: Vec<Item>,
    reset: ResetGuard,
}

impl EditSession {
    pub fn new(data: &TrackerData) -> Self {
        EditSession {
            categories: data.categories.clone(),
            items: data.items.clone(),
            original_categories: data.categories.clone(),
            original_items: data.items.clone(),
            reset: ResetGuard::default(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether the working copy differs from what the session was opened with
    pub fn is_dirty(&self) -> bool {
        self.categories != self.original_categories || self.items != self.original_items
    }

    // --- Categories ---

    /// Append a category. Returns its id.
    pub fn add_category(&mut self, name: Option<&str>) -> String {
        let id = ids::unique_id("cat", ids::now_millis(), "", |c| {
            self.categories.iter().any(|cat| cat.id == c)
        });
        self.categories.push(Category::new(
            id.clone(),
            name.unwrap_or(NEW_CATEGORY_NAME),
            NEW_CATEGORY_COLOR,
        ));
        id
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> bool {
        let Some(cat) = self.categories.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            cat.name = name;
        }
        if let Some(color) = patch.color {
            cat.color = color;
        }
        true
    }

    /// Remove a category together with every item filed under it
    pub fn delete_category(&mut self, id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return false;
        }
        self.items.retain(|i| i.category_id != id);
        true
    }

    pub fn move_category_up(&mut self, id: &str) -> bool {
        match self.category_position(id) {
            Some(idx) if idx > 0 => {
                self.categories.swap(idx - 1, idx);
                true
            }
            _ => false,
        }
    }

    pub fn move_category_down(&mut self, id: &str) -> bool {
        match self.category_position(id) {
            Some(idx) if idx + 1 < self.categories.len() => {
                self.categories.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    fn category_position(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    // --- Items ---

    /// Append a top-level item to a category. None if the category is unknown.
    pub fn add_item(&mut self, category_id: &str, name: Option<&str>) -> Option<String> {
        self.category_position(category_id)?;
        let id = self.next_item_id("");
        self.items
            .push(Item::new(id.clone(), name.unwrap_or(NEW_ITEM_NAME), category_id));
        Some(id)
    }

    /// Insert a sub-item directly after the parent's existing children (or
    /// after the parent itself). None if the parent is unknown or is itself a
    /// sub-item.
    pub fn add_sub_item(&mut self, parent_id: &str, name: Option<&str>) -> Option<String> {
        let parent_idx = self.items.iter().position(|i| i.id == parent_id)?;
        if !tree::is_top_level(&self.items, &self.items[parent_idx]) {
            return None;
        }

        let id = self.next_item_id("-sub");
        let child = Item::child_of(
            &self.items[parent_idx],
            id.clone(),
            name.unwrap_or(NEW_SUB_ITEM_NAME),
        );

        let mut insert_idx = parent_idx + 1;
        while insert_idx < self.items.len() && self.items[insert_idx].is_child_of(parent_id) {
            insert_idx += 1;
        }
        self.items.insert(insert_idx, child);
        Some(id)
    }

    pub fn rename_item(&mut self, id: &str, name: &str) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove an item and its direct children
    pub fn delete_item(&mut self, id: &str) -> bool {
        if !self.items.iter().any(|i| i.id == id) {
            return false;
        }
        self.items.retain(|i| i.id != id && !i.is_child_of(id));
        true
    }

    /// Move an item up among its siblings. Top-level items move with their
    /// children; sub-items swap within their parent.
    pub fn move_item_up(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return false;
        };
        if tree::is_top_level(&self.items, item) {
            let category_id = item.category_id.clone();
            self.move_top_level_up(&category_id, id)
        } else {
            let parent_id = item.parent_id.clone().unwrap_or_default();
            self.swap_child(&parent_id, id, Direction::Up)
        }
    }

    pub fn move_item_down(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return false;
        };
        if tree::is_top_level(&self.items, item) {
            let category_id = item.category_id.clone();
            let top = top_level_ids(&self.items, &category_id);
            match top.iter().position(|t| t == id) {
                Some(idx) if idx + 1 < top.len() => {
                    let next = top[idx + 1].clone();
                    self.move_top_level_up(&category_id, &next)
                }
                _ => false,
            }
        } else {
            let parent_id = item.parent_id.clone().unwrap_or_default();
            self.swap_child(&parent_id, id, Direction::Down)
        }
    }

    /// Swap the block of `id` (item plus children) with the block of the
    /// previous top-level sibling, reinserting both where the sibling's
    /// block started.
    fn move_top_level_up(&mut self, category_id: &str, id: &str) -> bool {
        let top = top_level_ids(&self.items, category_id);
        let idx = match top.iter().position(|t| t == id) {
            Some(idx) if idx > 0 => idx,
            _ => return false,
        };
        let sibling_id = &top[idx - 1];

        let item_block = tree::block_positions(&self.items, id);
        let sibling_block = tree::block_positions(&self.items, sibling_id);
        let Some(&sibling_start) = sibling_block.first() else {
            return false;
        };
        let moved: HashSet<usize> = item_block.iter().chain(&sibling_block).copied().collect();
        let insert_at = (0..sibling_start).filter(|k| !moved.contains(k)).count();

        let regrouped: Vec<Item> = item_block
            .iter()
            .chain(&sibling_block)
            .map(|&k| self.items[k].clone())
            .collect();
        let mut rest: Vec<Item> = std::mem::take(&mut self.items)
            .into_iter()
            .enumerate()
            .filter(|(k, _)| !moved.contains(k))
            .map(|(_, item)| item)
            .collect();
        rest.splice(insert_at..insert_at, regrouped);
        self.items = rest;
        true
    }

    fn swap_child(&mut self, parent_id: &str, id: &str, direction: Direction) -> bool {
        let siblings: Vec<String> = tree::children(&self.items, parent_id)
            .iter()
            .map(|i| i.id.clone())
            .collect();
        let Some(idx) = siblings.iter().position(|s| s == id) else {
            return false;
        };
        let other = match direction {
            Direction::Up if idx > 0 => &siblings[idx - 1],
            Direction::Down if idx + 1 < siblings.len() => &siblings[idx + 1],
            _ => return false,
        };
        let index = tree::IdIndex::build(&self.items);
        let (Some(a), Some(b)) = (index.position(id), index.position(other)) else {
            return false;
        };
        self.items.swap(a, b);
        true
    }

    fn next_item_id(&self, suffix: &str) -> String {
        let taken: HashSet<&str> = self.items.iter().map(|i| i.id.as_str()).collect();
        ids::unique_id("item", ids::now_millis(), suffix, |c| taken.contains(c))
    }

    // --- Reset ---

    /// First call arms the confirmation; the second replaces the working
    /// categories and items with the built-in checklist.
    pub fn request_reset(&mut self) -> ResetOutcome {
        if self.reset.request() {
            self.categories = default_categories();
            self.items = default_items();
            ResetOutcome::Reset
        } else {
            ResetOutcome::Armed
        }
    }

    pub fn cancel_reset(&mut self) {
        self.reset.cancel();
    }

    // --- Commit ---

    /// Build the snapshot to persist: trimmed names, the working categories
    /// and items, and `base`'s entries minus flags for items that no longer
    /// exist.
    pub fn save(&self, base: &TrackerData) -> Result<TrackerData, EditError> {
        let mut categories = self.categories.clone();
        for cat in &mut categories {
            cat.name = cat.name.trim().to_string();
            if cat.name.is_empty() {
                return Err(EditError::EmptyCategoryName(cat.id.clone()));
            }
        }
        let mut items = self.items.clone();
        for item in &mut items {
            item.name = item.name.trim().to_string();
            if item.name.is_empty() {
                return Err(EditError::EmptyItemName(item.id.clone()));
            }
        }

        let mut entries = base.entries.clone();
        let valid: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        entries.retain_items(&valid);

        Ok(TrackerData {
            categories,
            items,
            entries,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

fn top_level_ids(items: &[Item], category_id: &str) -> Vec<String> {
    tree::top_level_items(items, category_id)
        .iter()
        .map(|i| i.id.clone())
        .collect()
}

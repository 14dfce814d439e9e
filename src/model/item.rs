use serde::{Deserialize, Serialize};

/// A trackable observance. Top-level when `parent_id` is absent or does not
/// resolve to another item of the same category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Item {
    /// Create a top-level item
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            parent_id: None,
        }
    }

    /// Create a sub-item of `parent`, inheriting its category
    pub fn child_of(parent: &Item, id: impl Into<String>, name: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            category_id: parent.category_id.clone(),
            parent_id: Some(parent.id.clone()),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// True if this item declares `parent_id` as its parent
    pub fn is_child_of(&self, parent_id: &str) -> bool {
        self.parent_id.as_deref() == Some(parent_id)
    }
}

//! Read-only views over the flat item sequence.
//!
//! The sequence is authoritative; every view is re-derived per call.

use std::collections::{HashMap, HashSet};

use crate::model::item::Item;

/// A top-level item with its resolved children, in sequence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNode<'a> {
    pub item: &'a Item,
    pub children: Vec<&'a Item>,
}

/// id → position in the item sequence, built once per operation
pub struct IdIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> IdIndex<'a> {
    pub fn build(items: &'a [Item]) -> Self {
        let positions = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.as_str(), idx))
            .collect();
        IdIndex { positions }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }
}

/// Items of `category_id` with no parent resolvable inside that category.
/// A dangling `parent_id` counts as no parent.
pub fn top_level_items<'a>(items: &'a [Item], category_id: &str) -> Vec<&'a Item> {
    let in_category: HashSet<&str> = items
        .iter()
        .filter(|i| i.category_id == category_id)
        .map(|i| i.id.as_str())
        .collect();
    items
        .iter()
        .filter(|i| i.category_id == category_id)
        .filter(|i| match i.parent_id.as_deref() {
            None => true,
            Some(parent) => parent == i.id || !in_category.contains(parent),
        })
        .collect()
}

/// Items whose `parent_id` equals `parent_id`
pub fn children<'a>(items: &'a [Item], parent_id: &str) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|i| i.is_child_of(parent_id) && i.id != parent_id)
        .collect()
}

/// Whether `item` is a top-level item of its own category
pub fn is_top_level(items: &[Item], item: &Item) -> bool {
    match item.parent_id.as_deref() {
        None => true,
        Some(parent) => {
            parent == item.id
                || !items
                    .iter()
                    .any(|i| i.id == parent && i.category_id == item.category_id)
        }
    }
}

/// The grouped view of one category, as rendered in the tracker grid
pub fn category_tree<'a>(items: &'a [Item], category_id: &str) -> Vec<ItemNode<'a>> {
    top_level_items(items, category_id)
        .into_iter()
        .map(|item| ItemNode {
            item,
            children: items
                .iter()
                .filter(|i| {
                    i.category_id == category_id && i.is_child_of(&item.id) && i.id != item.id
                })
                .collect(),
        })
        .collect()
}

/// Positions of `id` and its direct children, parent first
pub fn block_positions(items: &[Item], id: &str) -> Vec<usize> {
    let index = IdIndex::build(items);
    let Some(head) = index.position(id) else {
        return Vec::new();
    };
    let mut block = vec![head];
    block.extend(
        items
            .iter()
            .enumerate()
            .filter(|(idx, i)| *idx != head && i.is_child_of(id))
            .map(|(idx, _)| idx),
    );
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::defaults::default_items;

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn top_level_excludes_resolved_children() {
        let items = default_items();
        let top = top_level_items(&items, "obligatory-salat");
        assert_eq!(ids(&top), vec!["fajr", "dhuhr", "asr", "maghrib", "isha"]);
    }

    #[test]
    fn children_in_sequence_order() {
        let mut items = default_items();
        items.insert(3, Item::new("dhuhr-nafl", "Nafl", "obligatory-salat").with_parent("dhuhr"));
        let kids = children(&items, "dhuhr");
        assert_eq!(ids(&kids), vec!["dhuhr-sunnah", "dhuhr-nafl"]);
    }

    #[test]
    fn dangling_parent_is_top_level() {
        let items = vec![
            Item::new("a", "A", "c"),
            Item::new("orphan", "Orphan", "c").with_parent("gone"),
        ];
        let top = top_level_items(&items, "c");
        assert_eq!(ids(&top), vec!["a", "orphan"]);
        assert!(is_top_level(&items, &items[1]));
    }

    #[test]
    fn parent_in_other_category_does_not_resolve() {
        let items = vec![
            Item::new("p", "P", "c1"),
            Item::new("x", "X", "c2").with_parent("p"),
        ];
        assert_eq!(ids(&top_level_items(&items, "c2")), vec!["x"]);
        assert!(category_tree(&items, "c1")[0].children.is_empty());
    }

    #[test]
    fn category_tree_groups_children() {
        let items = default_items();
        let tree = category_tree(&items, "obligatory-salat");
        assert_eq!(tree.len(), 5);
        assert_eq!(tree[1].item.id, "dhuhr");
        assert_eq!(ids(&tree[1].children), vec!["dhuhr-sunnah"]);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn unknown_category_is_empty() {
        let items = default_items();
        assert!(top_level_items(&items, "nope").is_empty());
        assert!(category_tree(&items, "nope").is_empty());
    }

    #[test]
    fn block_positions_of_parent_and_leaf() {
        let items = default_items();
        assert_eq!(block_positions(&items, "dhuhr"), vec![1, 2]);
        assert_eq!(block_positions(&items, "fajr"), vec![0]);
        assert!(block_positions(&items, "missing").is_empty());
    }

    #[test]
    fn id_index_lookups() {
        let items = default_items();
        let index = IdIndex::build(&items);
        assert_eq!(index.position("asr"), Some(3));
        assert_eq!(index.position("isha-sunnah"), Some(7));
        assert_eq!(index.position("witr"), None);
    }
}

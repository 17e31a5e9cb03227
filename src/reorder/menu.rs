//! Menu Tree Reconciliation
//!
//! Drag reorders only within one sibling set: root with root, or children of
//! the same parent. Changing a parent is an explicit edit (`reparent`).

use crate::domain::{BatchPolicy, MenuItem, MenuNode, MenuTree, OrderUpdate};
use super::batch::compute_batch;
use super::group::{Ordered, OrderedGroup};
use super::tree::{depth_violations, find_by_id, find_in_list, flatten, rebuild};
use super::ReorderError;

type Siblings = OrderedGroup<Option<String>, MenuItem>;

/// Split off the sibling set under `scope`
fn split_scope(flat: Vec<MenuItem>, scope: &Option<String>) -> (Siblings, Vec<MenuItem>) {
    let (siblings, rest): (Vec<_>, Vec<_>) =
        flat.into_iter().partition(|item| &item.parent_id == scope);
    (OrderedGroup::with_items(scope.clone(), siblings), rest)
}

/// Inverse of `split_scope`; `rebuild` restores per-parent order
fn join_scope(group: Siblings, rest: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut flat = group.items;
    flat.extend(rest);
    flat
}

impl MenuTree {
    /// Build from stored rows, sorted by `order`
    pub fn from_records(mut items: Vec<MenuItem>) -> Self {
        items.sort_by_key(|item| item.order);

        let invalid = depth_violations(&items);
        if !invalid.is_empty() {
            log::warn!("{} menu items break the two-level hierarchy: {:?}", invalid.len(), invalid);
        }
        rebuild(items)
    }

    /// Like `from_records`, but also returns the writes that make storage
    /// match the loaded tree when items had to be promoted to root: their
    /// cleared `parent_id` and a dense renumbering of the root level.
    pub fn from_records_repaired(items: Vec<MenuItem>) -> (Self, Vec<OrderUpdate>) {
        if depth_violations(&items).is_empty() {
            return (Self::from_records(items), Vec::new());
        }

        let before: Vec<OrderUpdate> = items.iter().map(Ordered::record).collect();
        let mut tree = Self::from_records(items);
        for (position, root) in tree.roots.iter_mut().enumerate() {
            root.item.set_order(position as u32);
        }
        let after = flatten(&tree).iter().map(Ordered::record).collect();

        let repairs = compute_batch(&before, after, BatchPolicy::Minimal);
        (tree, repairs)
    }

    pub fn find(&self, id: &str) -> Option<&MenuNode> {
        find_by_id(self, id)
    }

    /// All items, depth-first
    pub fn items(&self) -> Vec<MenuItem> {
        flatten(self)
    }

    pub fn len(&self) -> usize {
        self.roots.iter().map(|root| 1 + root.children.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Drop `dragged_id` onto `target_id`'s slot.
    ///
    /// Self-drops, unknown ids and moves between different sibling sets leave
    /// the tree unchanged and return an empty batch.
    pub fn apply_move(
        &mut self,
        dragged_id: &str,
        target_id: &str,
        policy: BatchPolicy,
    ) -> Vec<OrderUpdate> {
        if dragged_id == target_id {
            return Vec::new();
        }

        let flat = flatten(self);
        let (Some(dragged), Some(target)) =
            (find_in_list(&flat, dragged_id), find_in_list(&flat, target_id))
        else {
            log::debug!("Ignoring menu drag {} -> {}: unknown item", dragged_id, target_id);
            return Vec::new();
        };

        if dragged.parent_id != target.parent_id {
            log::debug!(
                "Rejecting menu drag {} -> {}: different parents {:?} / {:?}",
                dragged_id,
                target_id,
                dragged.parent_id,
                target.parent_id
            );
            return Vec::new();
        }

        let scope = dragged.parent_id.clone();
        let (mut group, rest) = split_scope(flat, &scope);
        let (Some(from), Some(to)) = (group.position_of(dragged_id), group.position_of(target_id))
        else {
            return Vec::new();
        };

        let before = group.records();
        let item = group.remove_at(from);
        group.insert_at(to, item);
        group.renumber();
        let after = group.records();

        *self = rebuild(join_scope(group, rest));
        compute_batch(&before, after, policy)
    }

    /// Append a new item to the end of its sibling set
    pub fn add_item(&mut self, mut item: MenuItem) -> Result<OrderUpdate, ReorderError> {
        let flat = flatten(self);
        if find_in_list(&flat, &item.id).is_some() {
            return Err(ReorderError::DuplicateId(item.id));
        }
        if let Some(parent_id) = &item.parent_id {
            let parent = find_in_list(&flat, parent_id)
                .ok_or_else(|| ReorderError::ParentNotFound(parent_id.clone()))?;
            if !parent.is_root() {
                return Err(ReorderError::DepthExceeded(item.id));
            }
        }

        let (mut group, rest) = split_scope(flat, &item.parent_id);
        item.order = group.len() as u32;
        let record = item.record();
        group.insert_at(group.len(), item);

        *self = rebuild(join_scope(group, rest));
        Ok(record)
    }

    /// Delete an item together with its children.
    ///
    /// Returns the removed items and the batch that closes the gap, or `None`
    /// if the id is unknown.
    pub fn remove_item(
        &mut self,
        id: &str,
        policy: BatchPolicy,
    ) -> Option<(Vec<MenuItem>, Vec<OrderUpdate>)> {
        let flat = flatten(self);
        let scope = find_in_list(&flat, id)?.parent_id.clone();

        let (removed, remaining): (Vec<_>, Vec<_>) = flat
            .into_iter()
            .partition(|item| item.id == id || item.parent_id.as_deref() == Some(id));

        let (mut group, rest) = split_scope(remaining, &scope);
        let before = group.records();
        group.renumber();
        let batch = compute_batch(&before, group.records(), policy);

        *self = rebuild(join_scope(group, rest));
        Some((removed, batch))
    }

    /// Move an item under `new_parent` (None = root), appended last
    pub fn reparent(
        &mut self,
        id: &str,
        new_parent: Option<String>,
        policy: BatchPolicy,
    ) -> Result<Vec<OrderUpdate>, ReorderError> {
        let flat = flatten(self);
        let old_parent = find_in_list(&flat, id)
            .ok_or_else(|| ReorderError::ItemNotFound(id.to_string()))?
            .parent_id
            .clone();

        if old_parent == new_parent {
            return Ok(Vec::new());
        }

        if let Some(parent_id) = &new_parent {
            if parent_id == id {
                return Err(ReorderError::DepthExceeded(id.to_string()));
            }
            let parent = find_in_list(&flat, parent_id)
                .ok_or_else(|| ReorderError::ParentNotFound(parent_id.clone()))?;
            let has_children = flat.iter().any(|item| item.parent_id.as_deref() == Some(id));
            if !parent.is_root() || has_children {
                return Err(ReorderError::DepthExceeded(id.to_string()));
            }
        }

        let (mut old_group, rest) = split_scope(flat, &old_parent);
        let mut before = old_group.records();
        let index = old_group
            .position_of(id)
            .ok_or_else(|| ReorderError::ItemNotFound(id.to_string()))?;
        let mut moved = old_group.remove_at(index);
        old_group.renumber();
        let mut after = old_group.records();

        let (mut new_group, rest) = split_scope(join_scope(old_group, rest), &new_parent);
        before.extend(new_group.records());
        moved.parent_id = new_parent;
        new_group.insert_at(new_group.len(), moved);
        new_group.renumber();
        after.extend(new_group.records());

        *self = rebuild(join_scope(new_group, rest));
        Ok(compute_batch(&before, after, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_MENU_DEPTH;

    fn item(id: &str, parent: Option<&str>, order: u32) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            order,
            label: id.to_string(),
            url: None,
        }
    }

    /// Roots [X, Y]; X has children [X1, X2]
    fn sample() -> MenuTree {
        MenuTree::from_records(vec![
            item("X", None, 0),
            item("Y", None, 1),
            item("X1", Some("X"), 0),
            item("X2", Some("X"), 1),
        ])
    }

    fn root_ids(tree: &MenuTree) -> Vec<&str> {
        tree.roots.iter().map(|n| n.item.id.as_str()).collect()
    }

    fn child_ids<'a>(tree: &'a MenuTree, parent: &str) -> Vec<&'a str> {
        tree.find(parent)
            .unwrap()
            .children
            .iter()
            .map(|n| n.item.id.as_str())
            .collect()
    }

    fn assert_dense(tree: &MenuTree) {
        let roots: Vec<u32> = tree.roots.iter().map(|n| n.item.order).collect();
        assert_eq!(roots, (0..roots.len() as u32).collect::<Vec<_>>());
        for root in &tree.roots {
            let orders: Vec<u32> = root.children.iter().map(|n| n.item.order).collect();
            assert_eq!(orders, (0..orders.len() as u32).collect::<Vec<_>>());
        }
    }

    fn assert_depth(tree: &MenuTree) {
        for root in &tree.roots {
            assert!(root.item.is_root());
            for child in &root.children {
                assert!(child.children.is_empty(), "depth beyond {}", MAX_MENU_DEPTH);
            }
        }
    }

    #[test]
    fn test_from_records_sorts_by_order() {
        let tree = MenuTree::from_records(vec![
            item("B", None, 1),
            item("A2", Some("A"), 1),
            item("A", None, 0),
            item("A1", Some("A"), 0),
        ]);
        assert_eq!(root_ids(&tree), vec!["A", "B"]);
        assert_eq!(child_ids(&tree, "A"), vec!["A1", "A2"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_promoted_orphan_is_repaired() {
        let (tree, repairs) = MenuTree::from_records_repaired(vec![
            item("X", None, 0),
            item("O", Some("gone"), 0),
            item("X1", Some("X"), 0),
            item("Y", None, 1),
        ]);

        assert_eq!(root_ids(&tree), vec!["X", "O", "Y"]);
        let orders: Vec<u32> = tree.roots.iter().map(|n| n.item.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(
            repairs,
            vec![
                OrderUpdate::under_parent("O", 1, None),
                OrderUpdate::under_parent("Y", 2, None),
            ]
        );
    }

    #[test]
    fn test_valid_records_need_no_repair() {
        let (tree, repairs) = MenuTree::from_records_repaired(flatten(&sample()));
        assert_eq!(tree, sample());
        assert!(repairs.is_empty());
    }

    #[test]
    fn test_reorder_roots() {
        let mut tree = sample();
        let batch = tree.apply_move("Y", "X", BatchPolicy::Minimal);

        assert_eq!(root_ids(&tree), vec!["Y", "X"]);
        assert_eq!(child_ids(&tree, "X"), vec!["X1", "X2"]);
        assert_eq!(
            batch,
            vec![
                OrderUpdate::under_parent("Y", 0, None),
                OrderUpdate::under_parent("X", 1, None),
            ]
        );
        assert_dense(&tree);
    }

    #[test]
    fn test_reorder_siblings() {
        let mut tree = MenuTree::from_records(vec![
            item("X", None, 0),
            item("X2", Some("X"), 0),
            item("X1", Some("X"), 1),
        ]);

        let batch = tree.apply_move("X1", "X2", BatchPolicy::Minimal);
        assert_eq!(child_ids(&tree, "X"), vec!["X1", "X2"]);
        assert_eq!(tree.find("X1").unwrap().item.order, 0);
        assert_eq!(tree.find("X2").unwrap().item.order, 1);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|u| u.placement == crate::domain::Placement::ParentId(Some("X".into()))));
    }

    #[test]
    fn test_self_drop_is_noop() {
        let mut tree = sample();
        let snapshot = tree.clone();
        assert!(tree.apply_move("X1", "X1", BatchPolicy::TouchedGroups).is_empty());
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_cross_level_moves_rejected() {
        let mut tree = sample();
        let snapshot = tree.clone();

        assert!(tree.apply_move("Y", "X1", BatchPolicy::TouchedGroups).is_empty());
        assert!(tree.apply_move("X2", "Y", BatchPolicy::TouchedGroups).is_empty());
        assert!(tree.apply_move("Y", "missing", BatchPolicy::TouchedGroups).is_empty());
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_cross_parent_move_rejected() {
        let mut tree = MenuTree::from_records(vec![
            item("X", None, 0),
            item("Y", None, 1),
            item("X1", Some("X"), 0),
            item("Y1", Some("Y"), 0),
        ]);
        let snapshot = tree.clone();
        assert!(tree.apply_move("X1", "Y1", BatchPolicy::Minimal).is_empty());
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_add_item_appends_to_siblings() {
        let mut tree = sample();
        let record = tree.add_item(MenuItem::new_child("X3", "X3", "X")).unwrap();
        assert_eq!(record, OrderUpdate::under_parent("X3", 2, Some("X".to_string())));
        assert_eq!(child_ids(&tree, "X"), vec!["X1", "X2", "X3"]);

        let record = tree.add_item(MenuItem::new("Z", "Z")).unwrap();
        assert_eq!(record.order, 2);
        assert_dense(&tree);
    }

    #[test]
    fn test_add_item_enforces_depth() {
        let mut tree = sample();
        assert_eq!(
            tree.add_item(MenuItem::new_child("deep", "deep", "X1")),
            Err(ReorderError::DepthExceeded("deep".to_string()))
        );
        assert_eq!(
            tree.add_item(MenuItem::new_child("n", "n", "nope")),
            Err(ReorderError::ParentNotFound("nope".to_string()))
        );
        assert_eq!(
            tree.add_item(MenuItem::new("Y", "again")),
            Err(ReorderError::DuplicateId("Y".to_string()))
        );
    }

    #[test]
    fn test_remove_item_cascades_and_renumbers() {
        let mut tree = MenuTree::from_records(vec![
            item("A", None, 0),
            item("B", None, 1),
            item("C", None, 2),
            item("B1", Some("B"), 0),
        ]);

        let (removed, batch) = tree.remove_item("B", BatchPolicy::Minimal).unwrap();
        let removed_ids: Vec<&str> = removed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(removed_ids, vec!["B", "B1"]);
        assert_eq!(root_ids(&tree), vec!["A", "C"]);
        assert_eq!(batch, vec![OrderUpdate::under_parent("C", 1, None)]);
        assert_dense(&tree);

        assert!(tree.remove_item("B", BatchPolicy::Minimal).is_none());
    }

    #[test]
    fn test_reparent_child_to_root() {
        let mut tree = sample();
        let batch = tree.reparent("X1", None, BatchPolicy::Minimal).unwrap();

        assert_eq!(root_ids(&tree), vec!["X", "Y", "X1"]);
        assert_eq!(child_ids(&tree, "X"), vec!["X2"]);
        assert_eq!(
            batch,
            vec![
                OrderUpdate::under_parent("X2", 0, Some("X".to_string())),
                OrderUpdate::under_parent("X1", 2, None),
            ]
        );
        assert_dense(&tree);
    }

    #[test]
    fn test_reparent_root_under_root() {
        let mut tree = sample();
        let batch = tree.reparent("Y", Some("X".to_string()), BatchPolicy::Minimal).unwrap();

        assert_eq!(root_ids(&tree), vec!["X"]);
        assert_eq!(child_ids(&tree, "X"), vec!["X1", "X2", "Y"]);
        assert_eq!(batch, vec![OrderUpdate::under_parent("Y", 2, Some("X".to_string()))]);
        assert_depth(&tree);
    }

    #[test]
    fn test_reparent_refuses_third_level() {
        let mut tree = sample();
        let snapshot = tree.clone();

        assert_eq!(
            tree.reparent("X", Some("Y".to_string()), BatchPolicy::Minimal),
            Err(ReorderError::DepthExceeded("X".to_string()))
        );
        assert_eq!(
            tree.reparent("Y", Some("X1".to_string()), BatchPolicy::Minimal),
            Err(ReorderError::DepthExceeded("Y".to_string()))
        );
        assert_eq!(
            tree.reparent("ghost", None, BatchPolicy::Minimal),
            Err(ReorderError::ItemNotFound("ghost".to_string()))
        );
        assert_eq!(tree, snapshot);
        assert_eq!(tree.reparent("X1", Some("X".to_string()), BatchPolicy::Minimal), Ok(vec![]));
    }

    #[test]
    fn test_invariants_hold_over_sequence() {
        let mut tree = sample();
        tree.add_item(MenuItem::new("Z", "Z")).unwrap();
        tree.add_item(MenuItem::new_child("Z1", "Z1", "Z")).unwrap();
        tree.apply_move("Z", "X", BatchPolicy::Minimal);
        tree.apply_move("X2", "X1", BatchPolicy::Minimal);
        tree.reparent("X2", Some("Y".to_string()), BatchPolicy::Minimal).unwrap();
        tree.remove_item("X", BatchPolicy::Minimal);
        tree.apply_move("Y", "Z", BatchPolicy::Minimal);

        assert_eq!(root_ids(&tree), vec!["Y", "Z"]);
        assert_eq!(child_ids(&tree, "Y"), vec!["X2"]);
        assert_eq!(child_ids(&tree, "Z"), vec!["Z1"]);
        assert_dense(&tree);
        assert_depth(&tree);
        assert!(depth_violations(&tree.items()).is_empty());
    }
}

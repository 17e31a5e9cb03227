//! Menu Tree Utilities
//!
//! Conversion between the nested menu and a flat list of parent-referencing
//! items. Parent/child links are always re-derived from `parent_id`.

use std::collections::{HashMap, HashSet};

use crate::domain::{MenuItem, MenuNode, MenuTree};

/// Depth-first: each root followed by its children
pub fn flatten(tree: &MenuTree) -> Vec<MenuItem> {
    fn collect(nodes: &[MenuNode], result: &mut Vec<MenuItem>) {
        for node in nodes {
            result.push(node.item.clone());
            collect(&node.children, result);
        }
    }

    let mut result = Vec::new();
    collect(&tree.roots, &mut result);
    result
}

/// Group a flat list back into a tree.
///
/// Roots keep their relative order and children attach in encounter order.
/// An item whose parent is missing or is itself a child is promoted to root
/// with `parent_id` cleared.
pub fn rebuild(flat: Vec<MenuItem>) -> MenuTree {
    let root_ids: HashSet<String> = flat
        .iter()
        .filter(|item| item.is_root())
        .map(|item| item.id.clone())
        .collect();

    let mut roots: Vec<MenuNode> = Vec::new();
    let mut children: Vec<MenuItem> = Vec::new();

    for mut item in flat {
        match item.parent_id.as_deref() {
            None => roots.push(MenuNode::leaf(item)),
            Some(parent) if root_ids.contains(parent) => children.push(item),
            Some(parent) => {
                log::warn!(
                    "Menu item {} references {} which is not a root item, promoting to root",
                    item.id,
                    parent
                );
                item.parent_id = None;
                roots.push(MenuNode::leaf(item));
            }
        }
    }

    let index: HashMap<String, usize> = roots
        .iter()
        .enumerate()
        .map(|(i, node)| (node.item.id.clone(), i))
        .collect();

    for child in children {
        let slot = child.parent_id.as_ref().and_then(|parent| index.get(parent));
        if let Some(&i) = slot {
            roots[i].children.push(MenuNode::leaf(child));
        }
    }

    MenuTree { roots }
}

/// Recursive search through the tree
pub fn find_by_id<'a>(tree: &'a MenuTree, id: &str) -> Option<&'a MenuNode> {
    fn search<'a>(nodes: &'a [MenuNode], id: &str) -> Option<&'a MenuNode> {
        for node in nodes {
            if node.item.id == id {
                return Some(node);
            }
            if let Some(found) = search(&node.children, id) {
                return Some(found);
            }
        }
        None
    }

    search(&tree.roots, id)
}

/// Linear search through a flattened list
pub fn find_in_list<'a>(items: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    items.iter().find(|item| item.id == id)
}

/// Ids of items whose parent is missing or is not a root
pub fn depth_violations(items: &[MenuItem]) -> Vec<String> {
    let parents: HashMap<&str, &MenuItem> =
        items.iter().map(|item| (item.id.as_str(), item)).collect();

    items
        .iter()
        .filter(|item| match item.parent_id.as_deref() {
            None => false,
            Some(parent) => parents.get(parent).map_or(true, |p| !p.is_root()),
        })
        .map(|item| item.id.clone())
        .collect()
}

//! Re-locating heading elements after the content re-renders.

use super::heading::{heading_level, HeadingItem};
use crate::content::{ContentTree, NodeId};

/// Find the live element for a previously extracted heading.
///
/// Tries, in order: the cached element if still connected; the element with
/// the item's id; the `occurrence`-th heading at the same level with the same
/// trimmed text under `root`. Falls back to the cached (possibly detached or
/// dead) handle. Identical headings swapped between passes can be
/// misattributed; nothing here can tell them apart.
pub fn resolve_heading_el(
    tree: &ContentTree,
    item: &HeadingItem,
    root: Option<NodeId>,
) -> Option<NodeId> {
    if tree.is_connected(item.element) {
        return Some(item.element);
    }

    if let Some(node) = tree.get_element_by_id(&item.id) {
        return Some(node);
    }

    if let Some(root) = root.filter(|r| tree.is_alive(*r)) {
        let found = tree
            .descendants(root)
            .into_iter()
            .filter(|node| tree.tag(*node).and_then(heading_level) == Some(item.level))
            .filter(|node| tree.text_content(*node).trim() == item.text)
            .nth(item.occurrence);
        if found.is_some() {
            return found;
        }
    }

    tree.is_alive(item.element).then_some(item.element)
}

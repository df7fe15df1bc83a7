//! Effective content height
//!
//! `scroll_height` overshoots when trailing blocks are empty placeholders and
//! undershoots while media is still sizing, so marker math uses the bottom
//! edge of the last block that actually renders something.

use crate::content::{ContentTree, NodeId};

/// Block-level tags whose bottom edges count toward the content extent.
const BLOCK_TAGS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "li",
    "pre",
    "blockquote",
    "table",
    "hr",
    "img",
    "video",
    "code",
];

/// Tags that render something visible even with no text.
const RENDERABLE_TAGS: &[&str] = &[
    "img",
    "video",
    "table",
    "pre",
    "code",
    "hr",
    "blockquote",
    "iframe",
    "svg",
];

fn is_renderable(tree: &ContentTree, node: NodeId) -> bool {
    tree.tag(node).is_some_and(|t| RENDERABLE_TAGS.contains(&t))
}

/// Whether a block contributes visible content: non-blank text, or itself
/// or some descendant being a renderable element.
fn has_visible_content(tree: &ContentTree, node: NodeId) -> bool {
    if !tree.text_content(node).trim().is_empty() || is_renderable(tree, node) {
        return true;
    }
    tree.descendants(node)
        .into_iter()
        .any(|d| is_renderable(tree, d))
}

/// Height of the content under `root`, measured from the root's top edge to
/// the furthest bottom edge of a visible block. Falls back to the root's
/// scroll height (at least 1) when no block qualifies.
pub fn effective_content_height(tree: &ContentTree, root: NodeId) -> f32 {
    let Some(root_rect) = tree.rect(root) else {
        return 1.0;
    };

    let furthest = tree
        .descendants(root)
        .into_iter()
        .filter(|node| tree.tag(*node).is_some_and(|t| BLOCK_TAGS.contains(&t)))
        .filter_map(|node| {
            let rect = tree.rect(node)?;
            (rect.height > 0.0 && has_visible_content(tree, node))
                .then(|| rect.bottom() - root_rect.top)
        })
        .fold(None, |acc: Option<f32>, bottom| {
            Some(acc.map_or(bottom, |a| a.max(bottom)))
        });

    match furthest {
        Some(bottom) if bottom > 0.0 => bottom,
        _ => tree.scroll_height(root).max(1.0),
    }
}

//! Heading extraction from rendered content
//!
//! Scans a content root for `h1`..`h6` elements in document order and builds
//! the identities the rest of the TOC engine keys on: a stable id, trimmed
//! text, level and an occurrence counter for duplicate headings.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::content::{ContentTree, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// HeadingItem
// ─────────────────────────────────────────────────────────────────────────────

/// One heading found in the live content.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingItem {
    /// Stable identity: the element id, else a slug of the text, else a
    /// synthesized `section-{level}-{n}-{occurrence}`. Unique per extraction.
    pub id: String,
    /// Trimmed visible text at extraction time
    pub text: String,
    /// Heading rank, 1-6
    pub level: u8,
    /// How many earlier headings in the same pass share `(level, text)`
    pub occurrence: usize,
    /// The element this was read from. Best-effort only: it goes stale when
    /// the content re-renders, see [`super::resolve_heading_el`].
    pub element: NodeId,
}

impl HeadingItem {
    /// Indentation depth relative to the shallowest heading in the list.
    pub fn depth(&self, min_level: u8) -> usize {
        self.level.saturating_sub(min_level) as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tag helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Heading rank for an `h1`..`h6` tag name, `None` for anything else.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(level_from_tag(tag)),
        _ => None,
    }
}

/// Parse the digit off a heading tag, clamped to 1-6 (1 when malformed).
fn level_from_tag(tag: &str) -> u8 {
    tag.get(1..)
        .and_then(|digits| digits.parse::<u8>().ok())
        .unwrap_or(1)
        .clamp(1, 6)
}

/// URL-fragment style slug: lowercase, punctuation dropped, whitespace to `-`.
pub fn slugify(text: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s_-]").expect("valid regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let lowered = text.trim().to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    spaces.replace_all(stripped.trim(), "-").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extract the ordered heading list from `root`.
///
/// A single `h1` that is also the first heading is treated as a duplicate of
/// the page title and left out. A missing or dead root yields an empty list.
pub fn extract_toc_items(tree: &ContentTree, root: Option<NodeId>) -> Vec<HeadingItem> {
    let Some(root) = root.filter(|r| tree.is_alive(*r)) else {
        return Vec::new();
    };

    let headings: Vec<(NodeId, u8)> = tree
        .descendants(root)
        .into_iter()
        .filter_map(|node| tree.tag(node).and_then(heading_level).map(|l| (node, l)))
        .collect();

    let mut seen: HashMap<(u8, String), usize> = HashMap::new();
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(headings.len());

    for (index, (node, level)) in headings.iter().copied().enumerate() {
        let text = tree.text_content(node).trim().to_string();
        let counter = seen.entry((level, text.clone())).or_insert(0);
        let occurrence = *counter;
        *counter += 1;

        let id = match tree.element_id(node).map(str::trim).filter(|s| !s.is_empty()) {
            Some(own) => own.to_string(),
            None => {
                let slug = slugify(&text);
                if slug.is_empty() {
                    format!("section-{}-{}-{}", level, index + 1, occurrence)
                } else {
                    slug
                }
            }
        };
        let id = dedupe_id(id, &mut used_ids);

        items.push(HeadingItem {
            id,
            text,
            level,
            occurrence,
            element: node,
        });
    }

    let h1_count = items.iter().filter(|i| i.level == 1).count();
    if h1_count == 1 && items.first().is_some_and(|i| i.level == 1) {
        items.remove(0);
    }

    items
}

fn dedupe_id(id: String, used: &mut HashSet<String>) -> String {
    if used.insert(id.clone()) {
        return id;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", id, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Cheap fingerprint of a heading list (`level:id:text` per item).
///
/// Two extractions with equal signatures are interchangeable for display.
pub fn signature(items: &[HeadingItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}:{}:{}", i.level, i.id, i.text))
        .collect::<Vec<_>>()
        .join("|")
}

/// Shallowest heading level present, or 1 for an empty list.
pub fn min_heading_level(items: &[HeadingItem]) -> u8 {
    items.iter().map(|i| i.level).min().unwrap_or(1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn build(headings: &[(&str, &str)]) -> (ContentTree, NodeId) {
        let mut tree = ContentTree::new();
        let root = tree.create_element("article");
        tree.append_child(tree.document(), root);
        for (tag, text) in headings {
            let el = tree.create_element(tag);
            tree.set_text(el, text);
            tree.append_child(root, el);
        }
        (tree, root)
    }

    fn texts(items: &[HeadingItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_empty_and_missing_root() {
        let (tree, root) = build(&[]);
        assert!(extract_toc_items(&tree, Some(root)).is_empty());
        assert!(extract_toc_items(&tree, None).is_empty());
    }

    #[test]
    fn test_document_order_preserved() {
        let (tree, root) = build(&[("h2", "A"), ("p", "body"), ("h3", "B"), ("h2", "C")]);
        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(texts(&items), vec!["A", "B", "C"]);
        assert_eq!(items[1].level, 3);
    }

    #[test]
    fn test_nested_headings_found() {
        let (mut tree, root) = build(&[("h2", "Top")]);
        let quote = tree.create_element("blockquote");
        let inner = tree.create_element("h4");
        tree.set_text(inner, "Quoted");
        tree.append_child(root, quote);
        tree.append_child(quote, inner);

        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(texts(&items), vec!["Top", "Quoted"]);
    }

    #[test]
    fn test_single_leading_h1_is_dropped() {
        let (tree, root) = build(&[("h1", "Title"), ("h2", "A"), ("h2", "B")]);
        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(texts(&items), vec!["A", "B"]);
    }

    #[test]
    fn test_two_h1s_are_kept() {
        let (tree, root) = build(&[("h1", "Title"), ("h1", "Other")]);
        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(texts(&items), vec!["Title", "Other"]);
    }

    #[test]
    fn test_single_h1_not_first_is_kept() {
        let (tree, root) = build(&[("h2", "Intro"), ("h1", "Late title")]);
        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_text_is_trimmed_and_includes_descendants() {
        let (mut tree, root) = build(&[("h2", "  Setup ")]);
        let h2 = tree.children(root)[0];
        let code = tree.create_element("code");
        tree.set_text(code, "cargo");
        tree.append_child(h2, code);

        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(items[0].text, "Setup cargo");
    }

    #[test]
    fn test_occurrence_counts_level_and_text() {
        let (tree, root) = build(&[
            ("h2", "Notes"),
            ("h3", "Notes"),
            ("h2", "Notes"),
            ("h2", "Other"),
        ]);
        let items = extract_toc_items(&tree, Some(root));
        let occurrences: Vec<usize> = items.iter().map(|i| i.occurrence).collect();
        assert_eq!(occurrences, vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_id_prefers_element_id() {
        let (mut tree, root) = build(&[("h2", "Install")]);
        let h2 = tree.children(root)[0];
        tree.set_element_id(h2, Some("getting-started"));

        let items = extract_toc_items(&tree, Some(root));
        assert_eq!(items[0].id, "getting-started");
    }

    #[test]
    fn test_ids_are_unique_within_pass() {
        let (tree, root) = build(&[("h2", "Notes"), ("h2", "Notes"), ("h2", ""), ("h2", "")]);
        let items = extract_toc_items(&tree, Some(root));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-1", "section-2-3-0", "section-2-4-1"]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Multiple   spaces  "), "multiple-spaces");
        assert_eq!(slugify("Ærlig talt: på norsk"), "ærlig-talt-på-norsk");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_heading_level_parsing() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
        assert_eq!(level_from_tag("hx"), 1);
        assert_eq!(level_from_tag("h9"), 6);
    }

    #[test]
    fn test_signature_changes_with_headings_only() {
        let (tree, root) = build(&[("h2", "A"), ("h2", "B")]);
        let first = signature(&extract_toc_items(&tree, Some(root)));

        let (tree2, root2) = build(&[("h2", "A"), ("p", "new paragraph"), ("h2", "B")]);
        let second = signature(&extract_toc_items(&tree2, Some(root2)));
        assert_eq!(first, second);

        let (tree3, root3) = build(&[("h2", "A"), ("h2", "B2")]);
        assert_ne!(first, signature(&extract_toc_items(&tree3, Some(root3))));
    }

    #[test]
    fn test_min_heading_level_and_depth() {
        let (tree, root) = build(&[("h3", "A"), ("h4", "B"), ("h5", "C")]);
        let items = extract_toc_items(&tree, Some(root));
        let min = min_heading_level(&items);
        assert_eq!(min, 3);
        assert_eq!(items[2].depth(min), 2);
        assert_eq!(min_heading_level(&[]), 1);
    }
}

//! Rail marker positions
//!
//! Each heading gets a true position (its fraction of the content height) and
//! a display position on the rail. Real notes bunch headings together, so the
//! display positions are pushed apart to a minimum gap while keeping order
//! and staying inside the rail's padded bounds.

use super::content_height::effective_content_height;
use super::geometry::{clamp, finite_or, ratio};
use super::heading::HeadingItem;
use crate::content::{ContentTree, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Largest rendered marker; half of it is kept clear at each rail end.
pub const MAX_MARKER_PX: f32 = 12.0;

/// Closest two markers may be drawn, in pixels.
pub const MIN_MARKER_GAP_PX: f32 = 6.0;

const MIN_SPAN_RATIO: f32 = 0.02;
const MAX_SPAN_RATIO: f32 = 0.35;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One heading's place on the rail.
#[derive(Debug, Clone, PartialEq)]
pub struct TocMarker {
    /// The heading this marker stands for
    pub item: HeadingItem,
    /// Position in the heading list
    pub index: usize,
    /// True position within the effective content height, 0-1
    pub top_ratio: f32,
    /// Position actually drawn on the rail, 0-1
    pub display_top_ratio: f32,
    /// Share of the document owned by this heading, 0.02-0.35
    pub span_ratio: f32,
}

/// Allowed range and spacing for display ratios on a rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBounds {
    pub min: f32,
    pub max: f32,
    pub min_gap: f32,
}

/// Display bounds for `count` markers on a rail of the given height.
///
/// The gap shrinks when the rail is too short to fit every marker at
/// [`MIN_MARKER_GAP_PX`].
pub fn marker_bounds(rail_height_px: f32, count: usize) -> MarkerBounds {
    let height = finite_or(rail_height_px, 0.0).max(1.0);
    let edge = clamp(MAX_MARKER_PX / 2.0 / height, 0.0, 0.45);
    let (min, max) = (edge, 1.0 - edge);
    let mut min_gap = MIN_MARKER_GAP_PX / height;
    if count > 1 {
        min_gap = min_gap.min((max - min) / (count - 1) as f32);
    }
    MarkerBounds { min, max, min_gap }
}

// ─────────────────────────────────────────────────────────────────────────────
// Distribution
// ─────────────────────────────────────────────────────────────────────────────

/// Spread raw ratios into a non-decreasing sequence inside `[min, max]` with
/// at least `min_gap` between neighbours where the range allows it.
pub fn distribute_marker_ratios(raw: &[f32], min: f32, max: f32, min_gap: f32) -> Vec<f32> {
    let n = raw.len();
    if n == 0 {
        return Vec::new();
    }
    let max = max.max(min);
    let gap = finite_or(min_gap, 0.0).max(0.0);

    let mut out: Vec<f32> = raw.iter().map(|r| clamp(*r, min, max)).collect();

    // Forward: each value at least `gap` past its predecessor.
    for i in 1..n {
        let floor = out[i - 1] + gap;
        if out[i] < floor {
            out[i] = floor;
        }
    }

    // Backward: leave room for the values after it, pull predecessors down.
    for i in (0..n).rev() {
        let cap = max - gap * (n - 1 - i) as f32;
        if out[i] > cap {
            out[i] = cap;
        }
        if i > 0 && out[i] - out[i - 1] < gap {
            out[i - 1] = out[i] - gap;
        }
    }

    out.into_iter().map(|v| clamp(v, min, max)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Marker Computation
// ─────────────────────────────────────────────────────────────────────────────

/// Build rail markers for `items`.
///
/// Heading positions come from `resolve`; headings that cannot be placed get
/// an evenly spaced stand-in. Without a root every marker is synthesized, so
/// the rail is populated before the content mounts.
pub fn compute_markers<F>(
    tree: &ContentTree,
    items: &[HeadingItem],
    root: Option<NodeId>,
    rail_height_px: f32,
    resolve: F,
) -> Vec<TocMarker>
where
    F: Fn(&HeadingItem) -> Option<NodeId>,
{
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }

    let (top_ratios, span_ratios) = match root.and_then(|r| tree.rect(r).map(|rect| (r, rect))) {
        Some((root, root_rect)) => {
            let height = effective_content_height(tree, root);
            let tops: Vec<f32> = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let synthetic = height * (i as f32 + 0.5) / n as f32;
                    let top = resolve(item)
                        .filter(|el| tree.is_connected(*el))
                        .and_then(|el| tree.rect(el))
                        .map(|rect| rect.top - root_rect.top)
                        .unwrap_or(synthetic);
                    clamp(finite_or(top, synthetic), 0.0, height)
                })
                .collect();

            let spans = tops
                .iter()
                .enumerate()
                .map(|(i, top)| {
                    let next = tops.get(i + 1).copied().unwrap_or(height);
                    let owned = (next - top).max(height * MIN_SPAN_RATIO);
                    clamp(owned / height, MIN_SPAN_RATIO, MAX_SPAN_RATIO)
                })
                .collect();
            let ratios = tops.iter().map(|top| ratio(*top, height)).collect();
            (ratios, spans)
        }
        None => {
            let ratios: Vec<f32> = (0..n).map(|i| (i + 1) as f32 / (n + 1) as f32).collect();
            let span = clamp(1.0 / n as f32, MIN_SPAN_RATIO, MAX_SPAN_RATIO);
            (ratios, vec![span; n])
        }
    };

    let bounds = marker_bounds(rail_height_px, n);
    let display = distribute_marker_ratios(&top_ratios, bounds.min, bounds.max, bounds.min_gap);

    items
        .iter()
        .enumerate()
        .map(|(index, item)| TocMarker {
            item: item.clone(),
            index,
            top_ratio: top_ratios[index],
            display_top_ratio: display[index],
            span_ratio: span_ratios[index],
        })
        .collect()
}

/// Recompute display positions for a new rail height without touching the DOM.
pub fn redistribute_markers(markers: &mut [TocMarker], rail_height_px: f32) {
    let bounds = marker_bounds(rail_height_px, markers.len());
    let raw: Vec<f32> = markers.iter().map(|m| m.top_ratio).collect();
    let display = distribute_marker_ratios(&raw, bounds.min, bounds.max, bounds.min_gap);
    for (marker, ratio) in markers.iter_mut().zip(display) {
        marker.display_top_ratio = ratio;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Rect;
    use crate::toc::{extract_toc_items, resolve_heading_el};

    const EPS: f32 = 1e-5;

    fn assert_well_formed(out: &[f32], min: f32, max: f32) {
        assert!(out.windows(2).all(|w| w[0] <= w[1] + EPS), "not sorted: {out:?}");
        assert!(out.iter().all(|v| *v >= min - EPS && *v <= max + EPS), "out of bounds: {out:?}");
    }

    #[test]
    fn test_distribute_empty() {
        assert!(distribute_marker_ratios(&[], 0.0, 1.0, 0.1).is_empty());
    }

    #[test]
    fn test_distribute_spreads_clusters() {
        let out = distribute_marker_ratios(&[0.1, 0.9, 0.9, 0.9, 0.9], 0.05, 0.95, 0.1);
        assert_eq!(out.len(), 5);
        assert_well_formed(&out, 0.05, 0.95);
        for w in out.windows(2) {
            assert!(w[1] - w[0] >= 0.1 - EPS, "gap too small: {out:?}");
        }
        assert!((out[4] - 0.95).abs() < EPS);
        assert!((out[0] - 0.1).abs() < EPS);
    }

    #[test]
    fn test_distribute_keeps_well_spaced_input() {
        let raw = [0.1, 0.3, 0.5, 0.7];
        assert_eq!(distribute_marker_ratios(&raw, 0.0, 1.0, 0.05), raw.to_vec());
    }

    #[test]
    fn test_distribute_unsorted_and_out_of_range() {
        let raw = [0.8, -3.0, 0.2, 5.0, f32::NAN, 0.5];
        let out = distribute_marker_ratios(&raw, 0.1, 0.9, 0.02);
        assert_eq!(out.len(), raw.len());
        assert_well_formed(&out, 0.1, 0.9);
    }

    #[test]
    fn test_distribute_gap_larger_than_range() {
        let out = distribute_marker_ratios(&[0.5; 10], 0.0, 1.0, 0.5);
        assert_eq!(out.len(), 10);
        assert_well_formed(&out, 0.0, 1.0);
    }

    #[test]
    fn test_distribute_many_random_inputs() {
        // Small deterministic LCG so the sweep is reproducible.
        let mut seed: u32 = 0x1234_5678;
        let mut next = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 8) as f32 / (1u32 << 24) as f32
        };
        for len in 1..40 {
            let raw: Vec<f32> = (0..len).map(|_| next() * 1.4 - 0.2).collect();
            let gap = next() * 0.1 + 0.001;
            let out = distribute_marker_ratios(&raw, 0.04, 0.96, gap);
            assert_eq!(out.len(), len);
            assert_well_formed(&out, 0.04, 0.96);
        }
    }

    #[test]
    fn test_marker_bounds_shrink_gap_for_crowded_rail() {
        let roomy = marker_bounds(400.0, 5);
        assert!((roomy.min - 6.0 / 400.0).abs() < EPS);
        assert!((roomy.min_gap - 6.0 / 400.0).abs() < EPS);

        let crowded = marker_bounds(100.0, 50);
        assert!(crowded.min_gap * 49.0 <= crowded.max - crowded.min + EPS);
    }

    fn laid_out_tree(headings: &[(f32, &str)], height: f32) -> (ContentTree, NodeId) {
        let mut tree = ContentTree::new();
        let root = tree.create_element("article");
        tree.append_child(tree.document(), root);
        tree.set_rect(root, Rect::new(0.0, 200.0, 600.0, height));
        for (top, text) in headings {
            let h = tree.create_element("h2");
            tree.set_text(h, text);
            tree.append_child(root, h);
            tree.set_rect(h, Rect::new(0.0, 200.0 + top, 600.0, 30.0));
        }
        let tail = tree.create_element("p");
        tree.set_text(tail, "end");
        tree.append_child(root, tail);
        tree.set_rect(tail, Rect::new(0.0, 200.0 + height - 20.0, 600.0, 20.0));
        (tree, root)
    }

    #[test]
    fn test_compute_markers_empty() {
        let tree = ContentTree::new();
        assert!(compute_markers(&tree, &[], None, 300.0, |_| None).is_empty());
    }

    #[test]
    fn test_compute_markers_true_ratios_and_spans() {
        let (tree, root) = laid_out_tree(&[(0.0, "A"), (100.0, "B"), (900.0, "C")], 1000.0);
        let items = extract_toc_items(&tree, Some(root));
        let markers = compute_markers(&tree, &items, Some(root), 400.0, |item| {
            resolve_heading_el(&tree, item, Some(root))
        });

        assert_eq!(markers.len(), 3);
        assert!((markers[0].top_ratio - 0.0).abs() < EPS);
        assert!((markers[1].top_ratio - 0.1).abs() < EPS);
        assert!((markers[2].top_ratio - 0.9).abs() < EPS);

        assert!((markers[0].span_ratio - 0.1).abs() < EPS);
        assert!((markers[1].span_ratio - 0.35).abs() < EPS);
        assert!((markers[2].span_ratio - 0.1).abs() < EPS);

        let display: Vec<f32> = markers.iter().map(|m| m.display_top_ratio).collect();
        let bounds = marker_bounds(400.0, 3);
        assert_well_formed(&display, bounds.min, bounds.max);
        assert_eq!(markers[2].index, 2);
        assert_eq!(markers[1].item.text, "B");
    }

    #[test]
    fn test_unresolved_heading_gets_synthetic_position() {
        let (tree, root) = laid_out_tree(&[(0.0, "A"), (500.0, "B")], 1000.0);
        let items = extract_toc_items(&tree, Some(root));
        let markers = compute_markers(&tree, &items, Some(root), 400.0, |_| None);

        assert!((markers[0].top_ratio - 0.25).abs() < EPS);
        assert!((markers[1].top_ratio - 0.75).abs() < EPS);
    }

    #[test]
    fn test_markers_without_root_are_evenly_spaced() {
        let (tree, root) = laid_out_tree(&[(0.0, "A"), (10.0, "B"), (20.0, "C")], 1000.0);
        let items = extract_toc_items(&tree, Some(root));
        let markers = compute_markers(&tree, &items, None, 400.0, |_| None);

        let ratios: Vec<f32> = markers.iter().map(|m| m.top_ratio).collect();
        assert!((ratios[0] - 0.25).abs() < EPS);
        assert!((ratios[1] - 0.5).abs() < EPS);
        assert!((ratios[2] - 0.75).abs() < EPS);
    }

    #[test]
    fn test_redistribute_tracks_rail_height() {
        let (tree, root) = laid_out_tree(&[(0.0, "A"), (5.0, "B"), (10.0, "C")], 1000.0);
        let items = extract_toc_items(&tree, Some(root));
        let mut markers = compute_markers(&tree, &items, Some(root), 600.0, |item| {
            resolve_heading_el(&tree, item, Some(root))
        });
        let tall_gap = markers[1].display_top_ratio - markers[0].display_top_ratio;

        redistribute_markers(&mut markers, 100.0);
        let short_gap = markers[1].display_top_ratio - markers[0].display_top_ratio;
        assert!(short_gap > tall_gap);
    }
}

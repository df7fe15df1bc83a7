//! Rail and panel placement
//!
//! Pure geometry: given where the content column sits in the window and how
//! many headings there are, decide where the rail goes, how wide the expanded
//! panel can be, how tall the collapsed rail is, and whether there is enough
//! room to leave the panel open without hovering.

use super::geometry::{clamp, finite_or};
use crate::content::{Rect, Viewport};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum distance kept between the rail/panel and the window edges.
pub const VIEWPORT_PADDING_PX: f32 = 8.0;

/// Gap between the content's right edge and the rail.
pub const RAIL_RIGHT_GAP_PX: f32 = 16.0;

/// Width of the collapsed rail's hit area.
pub const RAIL_WIDTH_PX: f32 = 20.0;

/// Gap between the rail and the expanded panel.
pub const PANEL_GAP_PX: f32 = 8.0;

/// Widest the expanded panel gets.
pub const PANEL_MAX_WIDTH_PX: f32 = 300.0;

/// Width below which the panel is not opened by default.
pub const PANEL_IDEAL_WIDTH_PX: f32 = 240.0;

/// Narrowest the expanded panel gets.
pub const PANEL_MIN_WIDTH_PX: f32 = 120.0;

/// Shortest the rail gets, regardless of heading count.
pub const MIN_RAIL_HEIGHT_PX: f32 = 96.0;

/// Collapsed rail height used when the window is too narrow for the full layout.
pub const COMPACT_RAIL_HEIGHT_PX: f32 = 120.0;

/// Rail height before any headings are added.
pub const RAIL_BASE_PX: f32 = 20.0;

/// Rail height added per heading.
pub const RAIL_ITEM_PITCH_PX: f32 = 32.0;

/// Reserved space between the rail's maximum height and the window height.
const VIEWPORT_HEIGHT_MARGIN_PX: f32 = 24.0;

// ─────────────────────────────────────────────────────────────────────────────
// TocLayout
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of rail/panel geometry for one window and content position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TocLayout {
    /// Left edge of the rail, in window coordinates
    pub rail_left_px: f32,
    /// Collapsed rail height derived from the heading count
    pub rail_height_px: f32,
    /// Tallest the rail or panel may grow
    pub viewport_max_height_px: f32,
    /// Left edge of the expanded panel after clamping into the window
    pub panel_left_px: f32,
    pub panel_width_px: f32,
    /// Clamped minus desired panel left; the panel slides in from this offset
    pub panel_offset_px: f32,
    /// The rail had to be pulled left of its ideal spot
    pub compact_at_rest: bool,
    /// There is enough room right of the rail to keep the panel open
    pub show_expanded_by_default: bool,
}

impl Default for TocLayout {
    fn default() -> Self {
        compute_toc_layout(Rect::default(), &Viewport::default(), 100.0, 0)
    }
}

/// Tallest the rail may grow for a window height and `max_vh` percentage.
pub fn viewport_max_height_px(viewport_height: f32, max_vh: f32) -> f32 {
    let height = finite_or(viewport_height, 0.0).max(0.0);
    let max_vh = clamp(finite_or(max_vh, 100.0), 0.0, 100.0);
    let bounded = (height - VIEWPORT_HEIGHT_MARGIN_PX).min(height * max_vh / 100.0);
    bounded.floor().max(MIN_RAIL_HEIGHT_PX)
}

/// Compute rail and panel geometry.
///
/// `root_rect` is the content root's rect relative to the window (the same
/// frame as [`Viewport`]). A zero-size rect is fine.
pub fn compute_toc_layout(
    root_rect: Rect,
    viewport: &Viewport,
    max_vh: f32,
    item_count: usize,
) -> TocLayout {
    let vw = finite_or(viewport.width, 0.0).max(0.0);
    let root_right = finite_or(root_rect.right(), 0.0);

    // Rail: just right of the content, pinned inside the window otherwise.
    let ideal_rail_left = root_right + RAIL_RIGHT_GAP_PX;
    let rail_min = VIEWPORT_PADDING_PX + RAIL_WIDTH_PX;
    let rail_max = (vw - VIEWPORT_PADDING_PX - RAIL_WIDTH_PX).max(rail_min);
    let rail_left_px = clamp(ideal_rail_left, rail_min, rail_max);
    let compact_at_rest = rail_left_px < ideal_rail_left - 1.0;

    // Panel: as wide as allowed, kept fully inside the window.
    let usable_width = vw - 2.0 * VIEWPORT_PADDING_PX;
    let panel_width_px = PANEL_MAX_WIDTH_PX
        .min(usable_width)
        .max(PANEL_MIN_WIDTH_PX);
    let desired_panel_left = rail_left_px + RAIL_WIDTH_PX + PANEL_GAP_PX;
    let panel_max_left = (vw - VIEWPORT_PADDING_PX - panel_width_px).max(VIEWPORT_PADDING_PX);
    let panel_left_px = clamp(desired_panel_left, VIEWPORT_PADDING_PX, panel_max_left);
    let panel_offset_px = panel_left_px - desired_panel_left;

    let room_right = vw - VIEWPORT_PADDING_PX - desired_panel_left;
    let show_expanded_by_default =
        room_right >= panel_width_px && room_right >= PANEL_IDEAL_WIDTH_PX;

    let viewport_max_height_px = viewport_max_height_px(viewport.height, max_vh);
    let mut wanted_height = RAIL_BASE_PX + item_count as f32 * RAIL_ITEM_PITCH_PX;
    if compact_at_rest {
        wanted_height = wanted_height.min(COMPACT_RAIL_HEIGHT_PX);
    }
    let rail_height_px = clamp(wanted_height, MIN_RAIL_HEIGHT_PX, viewport_max_height_px);

    TocLayout {
        rail_left_px,
        rail_height_px,
        viewport_max_height_px,
        panel_left_px,
        panel_width_px,
        panel_offset_px,
        compact_at_rest,
        show_expanded_by_default,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn column(left: f32, width: f32) -> Rect {
        Rect::new(left, 0.0, width, 2000.0)
    }

    #[test]
    fn test_wide_window_places_rail_beside_content() {
        let viewport = Viewport::new(1600.0, 900.0);
        let layout = compute_toc_layout(column(400.0, 700.0), &viewport, 100.0, 5);

        assert_eq!(layout.rail_left_px, 1100.0 + RAIL_RIGHT_GAP_PX);
        assert!(!layout.compact_at_rest);
        assert_eq!(layout.panel_width_px, PANEL_MAX_WIDTH_PX);
        assert_eq!(layout.panel_offset_px, 0.0);
        assert!(layout.show_expanded_by_default);
    }

    #[test]
    fn test_narrow_window_pins_rail_and_goes_compact() {
        let viewport = Viewport::new(800.0, 900.0);
        let layout = compute_toc_layout(column(40.0, 760.0), &viewport, 100.0, 5);

        assert_eq!(
            layout.rail_left_px,
            800.0 - VIEWPORT_PADDING_PX - RAIL_WIDTH_PX
        );
        assert!(layout.compact_at_rest);
        assert!(!layout.show_expanded_by_default);
        assert!(layout.panel_offset_px < 0.0);
        assert_eq!(layout.rail_height_px, COMPACT_RAIL_HEIGHT_PX);
    }

    #[test]
    fn test_medium_room_requires_hover() {
        // Room right of the panel start is between the minimum and ideal widths.
        let viewport = Viewport::new(1200.0, 900.0);
        let layout = compute_toc_layout(column(300.0, 650.0), &viewport, 100.0, 3);
        let room = 1200.0 - VIEWPORT_PADDING_PX - (966.0 + RAIL_WIDTH_PX + PANEL_GAP_PX);
        assert!(room < PANEL_IDEAL_WIDTH_PX);
        assert!(!layout.show_expanded_by_default);
        assert!(!layout.compact_at_rest);
    }

    #[test]
    fn test_panel_always_inside_viewport() {
        for vw in [160.0_f32, 320.0, 480.0, 800.0, 1024.0, 1440.0, 2560.0] {
            for left in [-200.0_f32, 0.0, 100.0, 400.0, 900.0, 3000.0] {
                for width in [0.0_f32, 300.0, 700.0, 1200.0] {
                    let layout = compute_toc_layout(
                        Rect::new(left, -50.0, width, 500.0),
                        &Viewport::new(vw, 700.0),
                        100.0,
                        8,
                    );
                    assert!(layout.panel_left_px >= VIEWPORT_PADDING_PX, "vw={vw} left={left}");
                    assert!(
                        layout.panel_left_px + layout.panel_width_px
                            <= vw - VIEWPORT_PADDING_PX + 0.001,
                        "vw={vw} left={left} width={width}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rail_height_grows_with_items_and_is_bounded() {
        let viewport = Viewport::new(1400.0, 600.0);
        let few = compute_toc_layout(column(200.0, 700.0), &viewport, 100.0, 1);
        let some = compute_toc_layout(column(200.0, 700.0), &viewport, 100.0, 6);
        let many = compute_toc_layout(column(200.0, 700.0), &viewport, 100.0, 200);

        assert_eq!(few.rail_height_px, MIN_RAIL_HEIGHT_PX);
        assert_eq!(some.rail_height_px, RAIL_BASE_PX + 6.0 * RAIL_ITEM_PITCH_PX);
        assert_eq!(many.rail_height_px, 600.0 - 24.0);
    }

    #[test]
    fn test_max_vh_bounds_height() {
        assert_eq!(viewport_max_height_px(1000.0, 50.0), 500.0);
        assert_eq!(viewport_max_height_px(1000.0, 100.0), 976.0);
        assert_eq!(viewport_max_height_px(100.0, 100.0), MIN_RAIL_HEIGHT_PX);
        assert_eq!(viewport_max_height_px(f32::NAN, 100.0), MIN_RAIL_HEIGHT_PX);
    }

    #[test]
    fn test_zero_size_root_is_finite() {
        let layout = compute_toc_layout(Rect::default(), &Viewport::new(0.0, 0.0), 100.0, 0);
        for value in [
            layout.rail_left_px,
            layout.rail_height_px,
            layout.viewport_max_height_px,
            layout.panel_left_px,
            layout.panel_width_px,
            layout.panel_offset_px,
        ] {
            assert!(value.is_finite());
        }
    }
}

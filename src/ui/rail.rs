//! Collapsed TOC rail
//!
//! A thin vertical track with one dot per heading and a translucent band over
//! the headings currently on screen. Purely presentational: it paints what the
//! controller computed and reports clicks and hover back.

use eframe::egui::{self, Color32, Id, Order, Pos2, Rect, Sense, Stroke, Vec2};

use super::Palette;
use crate::toc::{RailMarker, TocController, MAX_MARKER_PX, RAIL_WIDTH_PX};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Dot radius for the active marker; others are drawn smaller.
const ACTIVE_RADIUS: f32 = MAX_MARKER_PX / 2.0 - 1.0;
const MARKER_RADIUS: f32 = 3.0;

/// Horizontal shift per heading depth, capped so dots stay on the rail.
const DEPTH_SHIFT: f32 = 2.5;
const MAX_DEPTH_SHIFT: f32 = 7.5;

/// Pointer distance within which a click snaps to a marker.
const HIT_SLOP: f32 = 10.0;

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TocRailOutput {
    /// Pointer is over the rail
    pub hovered: bool,
    /// Marker index that was clicked
    pub clicked_marker: Option<usize>,
}

// ─────────────────────────────────────────────────────────────────────────────
// TocRail
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer crossing into or out of the rail (and its open panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Entered,
    Left,
}

#[derive(Debug, Clone, Default)]
pub struct TocRail {
    hovered: bool,
}

impl TocRail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's hover state (rail or open panel) and get the edge, if any.
    pub fn update_hover(&mut self, hovered: bool) -> Option<HoverChange> {
        if hovered == self.hovered {
            return None;
        }
        self.hovered = hovered;
        Some(if hovered {
            HoverChange::Entered
        } else {
            HoverChange::Left
        })
    }

    /// Paint the rail with its top edge at `top` (window coordinates).
    pub fn show(
        &self,
        ctx: &egui::Context,
        toc: &TocController,
        top: f32,
        palette: &Palette,
    ) -> TocRailOutput {
        let mut output = TocRailOutput::default();
        let height = toc.rail_height_px();
        let markers = toc.rail_markers();

        egui::Area::new(Id::new("toc_rail"))
            .order(Order::Foreground)
            .fixed_pos(Pos2::new(toc.rail_left_px(), top))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(RAIL_WIDTH_PX, height), Sense::click());
                let painter = ui.painter();

                painter.line_segment(
                    [rect.center_top(), rect.center_bottom()],
                    Stroke::new(1.0, palette.border),
                );

                let (band_start, band_end) = toc.visible_band_ratios();
                if !markers.is_empty() {
                    let band = Rect::from_x_y_ranges(
                        rect.x_range(),
                        marker_y(rect, band_start) - ACTIVE_RADIUS
                            ..=marker_y(rect, band_end) + ACTIVE_RADIUS,
                    );
                    painter.rect_filled(band, egui::Rounding::same(RAIL_WIDTH_PX / 2.0), palette.band);
                }

                for marker in &markers {
                    let center = marker_center(rect, marker);
                    let (radius, color) = marker_style(marker, palette);
                    painter.circle_filled(center, radius, color);
                }

                output.hovered = response.hovered();
                if let Some(pointer) = response.hover_pos() {
                    if let Some(marker) = nearest_marker(rect, &markers, pointer.y) {
                        if let Some(item) = toc.items().get(marker.index) {
                            response.clone().on_hover_text(item.text.as_str());
                        }
                    }
                }
                if response.clicked() {
                    output.clicked_marker = response
                        .interact_pointer_pos()
                        .and_then(|p| nearest_marker(rect, &markers, p.y))
                        .map(|m| m.index);
                }
            });

        output
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

fn marker_y(rail: Rect, ratio: f32) -> f32 {
    rail.top() + ratio * rail.height()
}

fn marker_center(rail: Rect, marker: &RailMarker) -> Pos2 {
    let shift = (marker.depth as f32 * DEPTH_SHIFT).min(MAX_DEPTH_SHIFT);
    Pos2::new(rail.center().x + shift, marker_y(rail, marker.display_top_ratio))
}

fn marker_style(marker: &RailMarker, palette: &Palette) -> (f32, Color32) {
    if marker.active {
        (ACTIVE_RADIUS, palette.accent)
    } else if marker.in_visible_range {
        (MARKER_RADIUS, palette.accent_soft)
    } else {
        (MARKER_RADIUS, palette.muted)
    }
}

/// Marker closest to `y`, if within [`HIT_SLOP`].
fn nearest_marker(rail: Rect, markers: &[RailMarker], y: f32) -> Option<&RailMarker> {
    markers
        .iter()
        .map(|m| (m, (marker_y(rail, m.display_top_ratio) - y).abs()))
        .filter(|(_, distance)| *distance <= HIT_SLOP)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

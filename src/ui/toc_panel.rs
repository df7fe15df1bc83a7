//! Expanded TOC panel
//!
//! A scrollable list of every heading beside the rail, shown on hover or by
//! default when there is room. Rows are indented by depth below the shallowest
//! heading; the active heading and the on-screen range are highlighted.

use eframe::egui::{self, Color32, Id, Order, Pos2, Response, ScrollArea, Sense, Ui, Vec2};
use std::time::Instant;

use super::scroll_animation::PendingScroll;
use super::Palette;
use crate::toc::{HeadingItem, ListGeometry, RowSpan, TocController};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Indentation per heading level.
const INDENT_PER_LEVEL: f32 = 14.0;

/// Height of each heading row.
const ITEM_HEIGHT: f32 = 24.0;

/// Title font size.
const TITLE_SIZE: f32 = 12.0;

/// Inner padding of the panel frame.
const FRAME_PADDING: f32 = 6.0;

// ─────────────────────────────────────────────────────────────────────────────
// TocPanelOutput
// ─────────────────────────────────────────────────────────────────────────────

/// What happened in the panel this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TocPanelOutput {
    /// Heading index that was clicked
    pub clicked_item: Option<usize>,
    /// Pointer is over the panel
    pub hovered: bool,
    /// Rendered height of the whole panel
    pub panel_height: f32,
    /// Row positions and scroll state of the list
    pub geometry: ListGeometry,
}

// ─────────────────────────────────────────────────────────────────────────────
// TocPanel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TocPanel {
    pending_scroll: Option<PendingScroll>,
    last_offset: f32,
}

impl TocPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a list scroll.
    pub fn scroll_to(&mut self, offset: f32, smooth: bool, now: Instant) {
        self.pending_scroll = Some(PendingScroll::new(self.last_offset, offset, smooth, now));
    }

    pub fn is_animating(&self) -> bool {
        self.pending_scroll.is_some()
    }

    /// Paint the panel with its top edge at `top`. `reveal` (0-1) slides the
    /// panel from beside the rail to its clamped position.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        toc: &TocController,
        top: f32,
        reveal: f32,
        palette: &Palette,
        now: Instant,
    ) -> TocPanelOutput {
        let mut output = TocPanelOutput::default();
        let width = toc.panel_width_px();
        let left = toc.panel_left_px() - toc.panel_offset_px() * (1.0 - reveal);
        let max_height = toc.panel_max_height_px();

        let area = egui::Area::new(Id::new("toc_panel"))
            .order(Order::Foreground)
            .fixed_pos(Pos2::new(left, top))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(palette.panel)
                    .stroke(egui::Stroke::new(1.0, palette.border))
                    .rounding(egui::Rounding::same(6.0))
                    .inner_margin(egui::Margin::same(FRAME_PADDING))
                    .show(ui, |ui| {
                        ui.set_width(width - 2.0 * FRAME_PADDING);
                        ui.spacing_mut().item_spacing = Vec2::ZERO;
                        self.show_list(ui, toc, max_height - 2.0 * FRAME_PADDING, palette, now, &mut output);
                    });
            });

        output.hovered = area.response.hovered()
            || ctx
                .pointer_hover_pos()
                .is_some_and(|p| area.response.rect.contains(p));
        output.panel_height = area.response.rect.height();
        output
    }

    fn show_list(
        &mut self,
        ui: &mut Ui,
        toc: &TocController,
        max_height: f32,
        palette: &Palette,
        now: Instant,
        output: &mut TocPanelOutput,
    ) {
        let items = toc.items();
        let min_level = toc.min_heading_level();
        let range = toc.visible_range();
        let active = toc.active_index();

        let mut area = ScrollArea::vertical()
            .id_source("toc_panel_list")
            .max_height(max_height.max(ITEM_HEIGHT));
        if let Some(pending) = self.pending_scroll.take() {
            let (offset, rest) = pending.step(now);
            self.pending_scroll = rest;
            area = area.vertical_scroll_offset(offset.max(0.0));
        }

        let mut rows = Vec::with_capacity(items.len());
        let scroll = area.show(ui, |ui| {
            let content_top = ui.min_rect().top();
            for (index, item) in items.iter().enumerate() {
                let style = RowStyle {
                    depth: item.depth(min_level),
                    is_active: index == active,
                    in_range: range.contains(index),
                };
                let response = render_row(ui, item, style, palette);
                rows.push(RowSpan {
                    top: response.rect.top() - content_top,
                    height: response.rect.height(),
                });
                if response.clicked() {
                    output.clicked_item = Some(index);
                }
            }
        });

        self.last_offset = scroll.state.offset.y;
        output.geometry = ListGeometry {
            scroll_offset: scroll.state.offset.y,
            viewport_height: scroll.inner_rect.height(),
            rows,
        };
    }
}

#[derive(Debug, Clone, Copy)]
struct RowStyle {
    depth: usize,
    is_active: bool,
    in_range: bool,
}

fn render_row(ui: &mut Ui, item: &HeadingItem, style: RowStyle, palette: &Palette) -> Response {
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), ITEM_HEIGHT), Sense::click());

    if style.is_active {
        ui.painter()
            .rect_filled(rect, egui::Rounding::same(3.0), palette.highlight);
    } else if response.hovered() {
        ui.painter()
            .rect_filled(rect, egui::Rounding::same(3.0), palette.hover);
    } else if style.in_range {
        ui.painter()
            .rect_filled(rect, egui::Rounding::same(3.0), palette.band);
    }

    let indent = style.depth as f32 * INDENT_PER_LEVEL;
    let title_x = rect.min.x + 8.0 + indent;
    let available_width = rect.max.x - title_x - 6.0;
    let title = truncate_text(&item.text, available_width, TITLE_SIZE);
    let color: Color32 = if style.is_active {
        palette.heading
    } else if style.in_range {
        palette.text
    } else {
        palette.muted
    };

    ui.painter().text(
        egui::pos2(title_x, rect.center().y),
        egui::Align2::LEFT_CENTER,
        title,
        egui::FontId::proportional(TITLE_SIZE),
        color,
    );

    response.on_hover_text(item.text.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Shorten `text` with an ellipsis to roughly fit `max_width`.
fn truncate_text(text: &str, max_width: f32, font_size: f32) -> String {
    let char_width = font_size * 0.55;
    let max_chars = (max_width / char_width).max(0.0) as usize;
    let count = text.chars().count();

    if count <= max_chars || max_chars < 4 {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars - 1).collect();
        format!("{}…", kept.trim_end())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Hello", 100.0, 11.0), "Hello");

        let long = "This is a very long heading that should be truncated";
        let truncated = truncate_text(long, 100.0, 11.0);
        assert!(truncated.ends_with('…'));
        assert!(truncated.chars().count() < long.chars().count());
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "Ærlig talt på norsk med mange ord";
        let truncated = truncate_text(text, 60.0, 11.0);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_tiny_width_keeps_text() {
        assert_eq!(truncate_text("Heading", 5.0, 11.0), "Heading");
    }

    #[test]
    fn test_scroll_to_queues_pending() {
        let mut panel = TocPanel::new();
        panel.scroll_to(120.0, false, Instant::now());
        assert!(panel.is_animating());
    }
}

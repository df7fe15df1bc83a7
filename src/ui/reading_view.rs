//! Reading view
//!
//! Paints a laid-out content tree inside a vertical scroll area. Layout runs
//! through [`layout_blocks`] with egui's own font metrics, so painted text
//! and the rects the TOC engine measures agree.

use eframe::egui::{self, Color32, FontId, Pos2, Rect as UiRect, ScrollArea, Sense, Stroke, Ui, Vec2};
use std::time::Instant;

use super::scroll_animation::PendingScroll;
use super::Palette;
use crate::content::{layout_blocks, LayoutMetrics, Page, Rect, TextMeasure, NodeId};

// ─────────────────────────────────────────────────────────────────────────────
// Text measurement
// ─────────────────────────────────────────────────────────────────────────────

/// Measures text with the context's fonts. Text at the code size is set in
/// the monospace family, everything else proportional.
pub struct EguiMeasure<'a> {
    ctx: &'a egui::Context,
    code_font_size: f32,
}

impl<'a> EguiMeasure<'a> {
    pub fn new(ctx: &'a egui::Context, metrics: &LayoutMetrics) -> Self {
        Self {
            ctx,
            code_font_size: metrics.code_font_size,
        }
    }
}

impl TextMeasure for EguiMeasure<'_> {
    fn text_height(&self, text: &str, font_size: f32, wrap_width: f32) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let font = font_for(font_size, self.code_font_size);
        self.ctx.fonts(|fonts| {
            fonts
                .layout(text.to_owned(), font, Color32::WHITE, wrap_width.max(1.0))
                .size()
                .y
        })
    }
}

fn font_for(size: f32, code_size: f32) -> FontId {
    if (size - code_size).abs() < f32::EPSILON {
        FontId::monospace(size)
    } else {
        FontId::proportional(size)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ReadingView
// ─────────────────────────────────────────────────────────────────────────────

/// What the view saw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingViewOutput {
    /// Current scroll offset
    pub scroll_y: f32,
    /// Visible size of the scroll area
    pub viewport_size: Vec2,
}

/// Scrollable, painted rendering of the note.
#[derive(Debug, Clone)]
pub struct ReadingView {
    metrics: LayoutMetrics,
    reading_width: f32,
    pending_scroll: Option<PendingScroll>,
    last_scroll_y: f32,
}

impl Default for ReadingView {
    fn default() -> Self {
        Self::new(LayoutMetrics::default(), 760.0)
    }
}

impl ReadingView {
    pub fn new(metrics: LayoutMetrics, reading_width: f32) -> Self {
        Self {
            metrics,
            reading_width,
            pending_scroll: None,
            last_scroll_y: 0.0,
        }
    }

    /// Left edge and width of the centered reading column.
    pub fn column(&self, available_width: f32) -> (f32, f32) {
        let width = self.reading_width.min(available_width).max(1.0);
        ((available_width - width) / 2.0, width)
    }

    /// Lay the content out for the given window width.
    pub fn relayout(&self, ctx: &egui::Context, page: &mut Page, root: NodeId, available_width: f32) {
        let (left, width) = self.column(available_width);
        let measure = EguiMeasure::new(ctx, &self.metrics);
        layout_blocks(&mut page.tree, root, left, 0.0, width, &self.metrics, &measure);
    }

    /// Queue a window scroll.
    pub fn scroll_to(&mut self, top: f32, smooth: bool, now: Instant) {
        self.pending_scroll = Some(PendingScroll::new(self.last_scroll_y, top, smooth, now));
    }

    pub fn is_animating(&self) -> bool {
        self.pending_scroll.is_some()
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        page: &Page,
        root: NodeId,
        palette: &Palette,
        now: Instant,
    ) -> ReadingViewOutput {
        let content_height = page.tree.rect(root).map(|r| r.bottom()).unwrap_or(0.0);

        let mut area = ScrollArea::vertical()
            .id_source("reading_view")
            .auto_shrink([false, false]);
        if let Some(pending) = self.pending_scroll.take() {
            let (offset, rest) = pending.step(now);
            self.pending_scroll = rest;
            area = area.vertical_scroll_offset(offset.max(0.0));
        }

        let output = area.show(ui, |ui| {
            let (canvas, _) = ui.allocate_exact_size(
                Vec2::new(ui.available_width(), content_height),
                Sense::hover(),
            );
            let clip = ui.clip_rect();
            self.paint(ui, page, root, canvas.min, clip, palette);
        });

        self.last_scroll_y = output.state.offset.y;
        ReadingViewOutput {
            scroll_y: output.state.offset.y,
            viewport_size: output.inner_rect.size(),
        }
    }

    fn paint(&self, ui: &Ui, page: &Page, root: NodeId, origin: Pos2, clip: UiRect, palette: &Palette) {
        let painter = ui.painter();
        let tree = &page.tree;
        let m = &self.metrics;
        let to_screen = |r: Rect| {
            UiRect::from_min_size(
                Pos2::new(origin.x + r.left, origin.y + r.top),
                Vec2::new(r.width, r.height),
            )
        };

        for node in tree.descendants(root) {
            let (Some(tag), Some(rect)) = (tree.tag(node), tree.rect(node)) else {
                continue;
            };
            let screen = to_screen(rect);
            if !screen.intersects(clip) {
                continue;
            }

            match tag {
                "hr" => {
                    let y = screen.center().y;
                    painter.line_segment(
                        [Pos2::new(screen.left(), y), Pos2::new(screen.right(), y)],
                        Stroke::new(1.0, palette.border),
                    );
                }
                "img" => {
                    painter.rect_filled(screen, egui::Rounding::same(4.0), palette.surface);
                    painter.rect_stroke(screen, egui::Rounding::same(4.0), Stroke::new(1.0, palette.border));
                    painter.text(
                        screen.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("🖼 {}", tree.own_text(node)),
                        FontId::proportional(m.body_font_size * 0.85),
                        palette.muted,
                    );
                }
                "pre" => {
                    painter.rect_filled(screen, egui::Rounding::same(4.0), palette.surface);
                }
                "table" => {
                    painter.rect_filled(screen, egui::Rounding::same(4.0), palette.surface);
                    let inner = screen.shrink(m.box_padding);
                    self.paint_text(painter, tree.own_text(node), m.code_font_size, inner, palette.text);
                }
                "blockquote" => {
                    painter.line_segment(
                        [screen.left_top(), screen.left_bottom()],
                        Stroke::new(3.0, palette.accent_soft),
                    );
                }
                "li" => {
                    let bullet = Pos2::new(screen.left() - 12.0, screen.top() + m.body_font_size * 0.7);
                    painter.circle_filled(bullet, 2.5, palette.muted);
                    self.paint_text(painter, tree.own_text(node), m.body_font_size, screen, palette.text);
                }
                _ => {
                    let color = if crate::toc::heading_level(tag).is_some() {
                        palette.heading
                    } else {
                        palette.text
                    };
                    self.paint_text(painter, tree.own_text(node), m.font_size_for(tag), screen, color);
                }
            }
        }
    }

    fn paint_text(&self, painter: &egui::Painter, text: &str, size: f32, rect: UiRect, color: Color32) {
        if text.trim().is_empty() {
            return;
        }
        let font = font_for(size, self.metrics.code_font_size);
        let galley = painter.layout(text.to_owned(), font, color, rect.width().max(1.0));
        painter.galley(rect.min, galley, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_is_centered() {
        let view = ReadingView::new(LayoutMetrics::default(), 700.0);
        assert_eq!(view.column(1500.0), (400.0, 700.0));
        assert_eq!(view.column(500.0), (0.0, 500.0));
    }

    #[test]
    fn test_code_size_uses_monospace() {
        assert_eq!(font_for(14.0, 14.0), FontId::monospace(14.0));
        assert_eq!(font_for(16.0, 14.0), FontId::proportional(16.0));
    }

    #[test]
    fn test_egui_measure_wraps() {
        let ctx = egui::Context::default();
        let metrics = LayoutMetrics::default();
        let measure = EguiMeasure::new(&ctx, &metrics);
        // Fonts are only available inside a frame.
        let _ = ctx.run(egui::RawInput::default(), |_| {});
        let one_line = measure.text_height("short", 16.0, 1000.0);
        let wrapped = measure.text_height(&"word ".repeat(200), 16.0, 200.0);
        assert!(one_line > 0.0);
        assert!(wrapped > one_line * 5.0);
        assert_eq!(measure.text_height("  ", 16.0, 100.0), 0.0);
    }

    #[test]
    fn test_scroll_to_queues_animation() {
        let mut view = ReadingView::default();
        assert!(!view.is_animating());
        view.scroll_to(300.0, true, Instant::now());
        assert!(view.is_animating());
    }
}

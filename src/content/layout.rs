//! Block-flow layout for the rendered note
//!
//! Assigns every element in a content root a page-space rectangle by stacking
//! blocks vertically. Text height comes from a [`TextMeasure`]; the GUI plugs
//! in egui's font system, headless callers use [`EstimatedMeasure`].

use super::tree::{ContentTree, NodeId, Rect};

// ─────────────────────────────────────────────────────────────────────────────
// Text Measurement
// ─────────────────────────────────────────────────────────────────────────────

/// Measures the rendered height of a run of text.
pub trait TextMeasure {
    /// Height in pixels of `text` set at `font_size` and wrapped at `wrap_width`.
    fn text_height(&self, text: &str, font_size: f32, wrap_width: f32) -> f32;
}

/// Character-count based estimate, used when no font system is available.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMeasure {
    /// Average glyph advance as a fraction of font size
    pub char_width_factor: f32,
    /// Line height as a multiple of font size
    pub line_height_factor: f32,
}

impl Default for EstimatedMeasure {
    fn default() -> Self {
        Self {
            char_width_factor: 0.55,
            line_height_factor: 1.4,
        }
    }
}

impl TextMeasure for EstimatedMeasure {
    fn text_height(&self, text: &str, font_size: f32, wrap_width: f32) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let char_width = (font_size * self.char_width_factor).max(1.0);
        let chars_per_line = (wrap_width / char_width).floor().max(1.0);
        let lines: f32 = text
            .split('\n')
            .map(|line| (line.chars().count() as f32 / chars_per_line).ceil().max(1.0))
            .sum();
        lines * font_size * self.line_height_factor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// Typographic metrics for the reading view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub body_font_size: f32,
    pub code_font_size: f32,
    /// Vertical gap between top-level blocks
    pub block_spacing: f32,
    /// Vertical gap between list items
    pub item_spacing: f32,
    pub list_indent: f32,
    pub quote_indent: f32,
    /// Inner padding of code blocks and tables
    pub box_padding: f32,
    /// Height of image placeholders
    pub image_height: f32,
    pub rule_height: f32,
    /// Padding above the first and below the last block
    pub root_padding: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            body_font_size: 16.0,
            code_font_size: 14.0,
            block_spacing: 14.0,
            item_spacing: 4.0,
            list_indent: 24.0,
            quote_indent: 16.0,
            box_padding: 10.0,
            image_height: 220.0,
            rule_height: 17.0,
            root_padding: 24.0,
        }
    }
}

impl LayoutMetrics {
    /// Font size for a heading of the given level (1-6).
    pub fn heading_font_size(&self, level: u8) -> f32 {
        let scale = match level {
            1 => 2.0,
            2 => 1.6,
            3 => 1.35,
            4 => 1.2,
            5 => 1.05,
            _ => 1.0,
        };
        self.body_font_size * scale
    }

    /// Font size an element's own text is painted with.
    pub fn font_size_for(&self, tag: &str) -> f32 {
        match tag {
            "code" | "table" => self.code_font_size,
            _ => match crate::toc::heading_level(tag) {
                Some(level) => self.heading_font_size(level),
                None => self.body_font_size,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Lay out `root` inside a column starting at (`left`, `top`) of the given width.
///
/// Returns the root's total height.
pub fn layout_blocks(
    tree: &mut ContentTree,
    root: NodeId,
    left: f32,
    top: f32,
    width: f32,
    metrics: &LayoutMetrics,
    measure: &dyn TextMeasure,
) -> f32 {
    let mut flow = Flow {
        tree,
        metrics,
        measure,
    };
    let pad = metrics.root_padding;
    let inner = flow.stack_children(
        root,
        left,
        top + pad,
        width,
        metrics.block_spacing,
    );
    let height = inner + 2.0 * pad;
    flow.tree.set_rect(root, Rect::new(left, top, width, height));
    height
}

struct Flow<'a> {
    tree: &'a mut ContentTree,
    metrics: &'a LayoutMetrics,
    measure: &'a dyn TextMeasure,
}

impl Flow<'_> {
    fn stack_children(&mut self, node: NodeId, left: f32, top: f32, width: f32, gap: f32) -> f32 {
        let children = self.tree.children(node).to_vec();
        let mut y = top;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                y += gap;
            }
            y += self.layout_node(*child, left, y, width);
        }
        y - top
    }

    fn own_text_height(&self, node: NodeId, font_size: f32, width: f32) -> f32 {
        self.measure
            .text_height(self.tree.own_text(node), font_size, width)
    }

    fn layout_node(&mut self, node: NodeId, left: f32, top: f32, width: f32) -> f32 {
        let m = *self.metrics;
        let tag = self.tree.tag(node).unwrap_or_default().to_string();
        let width = width.max(1.0);

        let height = match tag.as_str() {
            "hr" => m.rule_height,
            "img" => m.image_height,
            "ul" | "ol" => {
                let indent = m.list_indent.min(width * 0.5);
                self.stack_children(node, left + indent, top, width - indent, m.item_spacing)
            }
            "blockquote" => {
                let indent = m.quote_indent.min(width * 0.5);
                self.stack_children(node, left + indent, top, width - indent, m.block_spacing)
            }
            "pre" => {
                let inner_width = (width - 2.0 * m.box_padding).max(1.0);
                let inner = self.stack_children(
                    node,
                    left + m.box_padding,
                    top + m.box_padding,
                    inner_width,
                    0.0,
                );
                inner + 2.0 * m.box_padding
            }
            "table" => {
                let inner_width = (width - 2.0 * m.box_padding).max(1.0);
                self.own_text_height(node, m.code_font_size, inner_width) + 2.0 * m.box_padding
            }
            _ => {
                // Headings, paragraphs, list items, code and generic containers:
                // own text first, then any nested blocks below it.
                let text = self.own_text_height(node, m.font_size_for(&tag), width);
                let has_children = !self.tree.children(node).is_empty();
                let gap = if text > 0.0 && has_children {
                    m.item_spacing
                } else {
                    0.0
                };
                let nested = self.stack_children(node, left, top + text + gap, width, m.item_spacing);
                text + gap + nested
            }
        };

        self.tree.set_rect(node, Rect::new(left, top, width, height));
        height
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

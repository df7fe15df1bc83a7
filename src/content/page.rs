//! A content tree plus the window it is scrolled in.

use super::tree::{ContentTree, NodeId, Rect};

/// Window size and vertical scroll position, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }
}

/// The rendered page: element tree and the viewport looking at it.
#[derive(Debug, Default)]
pub struct Page {
    pub tree: ContentTree,
    pub viewport: Viewport,
}

impl Page {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tree: ContentTree::new(),
            viewport,
        }
    }

    /// Rect of `node` relative to the viewport's top-left corner.
    pub fn client_rect(&self, node: NodeId) -> Option<Rect> {
        self.tree
            .rect(node)
            .map(|r| r.translate_y(-self.viewport.scroll_y))
    }

    /// Largest valid `scroll_y` for the document's current extent.
    pub fn max_scroll(&self) -> f32 {
        let doc = self.tree.document();
        let extent = self
            .tree
            .descendants(doc)
            .into_iter()
            .filter_map(|n| self.tree.rect(n))
            .map(|r| r.bottom())
            .fold(0.0_f32, f32::max);
        (extent - self.viewport.height).max(0.0)
    }

    /// Scroll the window, clamped to the document extent.
    pub fn scroll_to(&mut self, y: f32) {
        self.viewport.scroll_y = y.max(0.0).min(self.max_scroll());
    }
}

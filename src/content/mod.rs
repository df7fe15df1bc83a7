//! Rendered note content
//!
//! The element tree the TOC engine observes, the page/viewport it is
//! scrolled in, and the host-side Markdown rendering and layout that
//! produce it.

pub mod layout;
pub mod markdown;
mod page;
mod tree;

pub use layout::{layout_blocks, EstimatedMeasure, LayoutMetrics, TextMeasure};
pub use markdown::{render_markdown, render_markdown_with_options, MarkdownOptions};
pub use page::{Page, Viewport};
pub use tree::{ContentTree, NodeId, Rect, DOCUMENT_TAG};

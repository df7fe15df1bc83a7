//! Table-of-contents engine
//!
//! Tracks the headings of a live content tree and maps them onto a compact
//! rail of markers plus an expandable heading list. Everything here is plain
//! geometry over [`crate::content`]; the egui views live in [`crate::ui`].

mod active_range;
mod content_height;
mod controller;
mod geometry;
mod heading;
mod layout;
mod markers;
mod resolver;
mod schedule;

pub use active_range::{resolve_active_range, ActiveRange};
pub use content_height::effective_content_height;
pub use controller::{
    ExpandState, ListGeometry, RailMarker, RowSpan, TocCommand, TocController, TocOptions,
    KEEP_VISIBLE_PADDING_PX,
};
pub use geometry::{clamp, ratio};
pub use heading::{
    extract_toc_items, heading_level, min_heading_level, signature, slugify, HeadingItem,
};
pub use layout::{
    compute_toc_layout, viewport_max_height_px, TocLayout, MIN_RAIL_HEIGHT_PX, PANEL_GAP_PX,
    RAIL_WIDTH_PX, VIEWPORT_PADDING_PX,
};
pub use markers::{
    compute_markers, distribute_marker_ratios, marker_bounds, redistribute_markers, MarkerBounds,
    TocMarker, MAX_MARKER_PX, MIN_MARKER_GAP_PX,
};
pub use resolver::resolve_heading_el;
pub use schedule::{Debouncer, IntervalTimer};

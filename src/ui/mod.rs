//! egui views for the reading window
//!
//! The views only paint controller state and report input; all TOC decisions
//! live in [`crate::toc`].

mod palette;
mod rail;
mod reading_view;
mod scroll_animation;
mod toc_panel;

pub use palette::{apply_theme, Palette};
pub use rail::{HoverChange, TocRail, TocRailOutput};
pub use reading_view::{EguiMeasure, ReadingView, ReadingViewOutput};
pub use scroll_animation::{PendingScroll, ScrollAnimation, SMOOTH_SCROLL_DURATION};
pub use toc_panel::{TocPanel, TocPanelOutput};

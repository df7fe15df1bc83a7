//! tocrail
//!
//! A Markdown reader with a scroll-synced table-of-contents rail. The TOC
//! engine in [`toc`] observes a rendered [`content`] tree and keeps the rail
//! markers, the active heading and the on-screen range in sync with scrolling.

pub mod app;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod toc;
pub mod ui;
pub mod watcher;

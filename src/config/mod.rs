//! Configuration module
//!
//! User preferences (theme, reading column, TOC tuning), serialized to JSON
//! in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;

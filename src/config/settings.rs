//! User settings for tocrail
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::toc::TocOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the reading view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Initial window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TOC Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for the table-of-contents rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocSettings {
    /// Show the rail at all
    pub enabled: bool,
    /// Tallest the rail/panel may grow, as a percentage of the window height
    pub max_vh: f32,
    /// Quiet period after content changes before headings are rescanned
    pub mutation_debounce_ms: u64,
    /// How often to look for the content root before it is mounted
    pub root_poll_interval_ms: u64,
    /// Where a heading lands below the window top after navigation
    pub reading_offset_px: f32,
    /// Top inset of the band that decides the active heading
    pub visible_top_inset_px: f32,
    /// Bottom inset of the same band
    pub visible_bottom_inset_px: f32,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_vh: 100.0,
            mutation_debounce_ms: 250,
            root_poll_interval_ms: 300,
            reading_offset_px: 80.0,
            visible_top_inset_px: 80.0,
            visible_bottom_inset_px: 40.0,
        }
    }
}

impl TocSettings {
    pub const MIN_MAX_VH: f32 = 10.0;
    pub const MAX_MAX_VH: f32 = 100.0;
    pub const MIN_DEBOUNCE_MS: u64 = 16;
    pub const MAX_DEBOUNCE_MS: u64 = 5_000;
    pub const MIN_POLL_MS: u64 = 50;
    pub const MAX_POLL_MS: u64 = 10_000;
    /// Upper bound for the reading offset and band insets.
    pub const MAX_INSET_PX: f32 = 400.0;

    pub fn sanitize(&mut self) {
        self.max_vh = self.max_vh.clamp(Self::MIN_MAX_VH, Self::MAX_MAX_VH);
        self.mutation_debounce_ms = self
            .mutation_debounce_ms
            .clamp(Self::MIN_DEBOUNCE_MS, Self::MAX_DEBOUNCE_MS);
        self.root_poll_interval_ms = self
            .root_poll_interval_ms
            .clamp(Self::MIN_POLL_MS, Self::MAX_POLL_MS);
        self.reading_offset_px = self.reading_offset_px.clamp(0.0, Self::MAX_INSET_PX);
        self.visible_top_inset_px = self.visible_top_inset_px.clamp(0.0, Self::MAX_INSET_PX);
        self.visible_bottom_inset_px = self
            .visible_bottom_inset_px
            .clamp(0.0, Self::MAX_INSET_PX);
    }

    /// Runtime options for the controller.
    pub fn to_options(&self) -> TocOptions {
        TocOptions {
            max_vh: self.max_vh,
            mutation_debounce: Duration::from_millis(self.mutation_debounce_ms),
            root_poll_interval: Duration::from_millis(self.root_poll_interval_ms),
            reading_offset_px: self.reading_offset_px,
            visible_top_inset_px: self.visible_top_inset_px,
            visible_bottom_inset_px: self.visible_bottom_inset_px,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Body font size (in points)
    pub font_size: f32,

    /// Width of the reading column in pixels
    pub reading_width: f32,

    /// Initial window size
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Table of contents
    // ─────────────────────────────────────────────────────────────────────────
    pub toc: TocSettings,
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Narrowest reading column.
    pub const MIN_READING_WIDTH: f32 = 320.0;
    /// Widest reading column.
    pub const MAX_READING_WIDTH: f32 = 2000.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
        self.reading_width = self
            .reading_width
            .clamp(Self::MIN_READING_WIDTH, Self::MAX_READING_WIDTH);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.toc.sanitize();
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 16.0,
            reading_width: 760.0,
            window_size: WindowSize::default(),
            toc: TocSettings::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Colors for the reading view and TOC, light and dark.

use eframe::egui::{self, Color32, Visuals};

use crate::config::Theme;

/// Resolved colors for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub surface: Color32,
    pub border: Color32,
    pub text: Color32,
    pub heading: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    /// Fill behind the on-screen heading range
    pub band: Color32,
    pub highlight: Color32,
    pub hover: Color32,
}

impl Palette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                background: Color32::from_rgb(30, 30, 30),
                panel: Color32::from_rgb(35, 35, 35),
                surface: Color32::from_rgb(45, 45, 48),
                border: Color32::from_rgb(60, 60, 60),
                text: Color32::from_rgb(200, 200, 200),
                heading: Color32::from_rgb(235, 235, 235),
                muted: Color32::from_rgb(130, 130, 130),
                accent: Color32::from_rgb(130, 180, 255),
                accent_soft: Color32::from_rgb(80, 110, 150),
                band: Color32::from_rgba_unmultiplied(130, 180, 255, 28),
                highlight: Color32::from_rgb(60, 80, 110),
                hover: Color32::from_rgb(50, 50, 55),
            }
        } else {
            Self {
                background: Color32::from_rgb(255, 255, 255),
                panel: Color32::from_rgb(250, 250, 250),
                surface: Color32::from_rgb(244, 244, 246),
                border: Color32::from_rgb(210, 210, 210),
                text: Color32::from_rgb(50, 50, 50),
                heading: Color32::from_rgb(20, 20, 20),
                muted: Color32::from_rgb(120, 120, 120),
                accent: Color32::from_rgb(40, 100, 180),
                accent_soft: Color32::from_rgb(150, 185, 225),
                band: Color32::from_rgba_unmultiplied(40, 100, 180, 24),
                highlight: Color32::from_rgb(220, 235, 250),
                hover: Color32::from_rgb(235, 235, 240),
            }
        }
    }
}

/// Apply the configured theme to `ctx`. Returns whether the result is dark.
///
/// `System` leaves egui's visuals alone; eframe follows the OS setting.
pub fn apply_theme(ctx: &egui::Context, theme: Theme) -> bool {
    match theme {
        Theme::Light => ctx.set_visuals(Visuals::light()),
        Theme::Dark => ctx.set_visuals(Visuals::dark()),
        Theme::System => {}
    }
    ctx.style().visuals.dark_mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::new(true), Palette::new(false));
    }

    #[test]
    fn test_apply_theme() {
        let ctx = egui::Context::default();
        assert!(apply_theme(&ctx, Theme::Dark));
        assert!(!apply_theme(&ctx, Theme::Light));
        assert!(!apply_theme(&ctx, Theme::System));
    }
}

//! Theme and styling for the status overlay
//!
//! Everything a surface needs to draw a notification lives here; there is
//! no external stylesheet.

use std::time::Duration;

use super::overlay::NotificationStyle;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Truecolor foreground escape for terminals
    pub fn ansi_fg(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }
}

/// Overlay color palette
pub struct Theme;

impl Theme {
    // Status colors
    pub const SUCCESS: Rgb = Rgb(16, 185, 129); // Emerald-500
    pub const INFO: Rgb = Rgb(6, 182, 212); // Cyan-500

    // Neutral colors (dark theme)
    pub const BG_ELEVATED: Rgb = Rgb(30, 30, 45); // Modals/dropdowns
    pub const TEXT_PRIMARY: Rgb = Rgb(250, 250, 255); // Near white
    pub const TEXT_MUTED: Rgb = Rgb(113, 113, 132); // Gray-500

    pub const RESET: &'static str = "\x1b[0m";

    // Overlay geometry
    pub const OVERLAY_OFFSET_PX: u32 = 20;
    pub const OVERLAY_RADIUS_PX: u32 = 8;
    pub const OVERLAY_Z_INDEX: u32 = 10000;

    /// Accent (border/icon) color for a notification style
    pub fn accent(style: NotificationStyle) -> Rgb {
        match style {
            NotificationStyle::Info => Self::INFO,
            NotificationStyle::Success => Self::SUCCESS,
        }
    }

    /// Complete inline style for a floating notification element. Nothing
    /// else is needed to render it, and opacity transitions over `fade`.
    pub fn inline_style(style: NotificationStyle, fade: Duration) -> String {
        let accent = Self::accent(style);
        format!(
            "position: fixed; top: {offset}px; right: {offset}px; z-index: {z}; \
             padding: 12px 20px; border-radius: {radius}px; \
             background: {bg}; color: {text}; border-left: 4px solid {accent}; \
             font-family: system-ui, sans-serif; font-size: 14px; \
             box-shadow: 0 4px 12px rgba(0, 0, 0, 0.3); \
             opacity: 1; transition: opacity {fade}ms ease;",
            offset = Self::OVERLAY_OFFSET_PX,
            z = Self::OVERLAY_Z_INDEX,
            radius = Self::OVERLAY_RADIUS_PX,
            bg = Self::BG_ELEVATED.hex(),
            text = Self::TEXT_PRIMARY.hex(),
            accent = accent.hex(),
            fade = fade.as_millis(),
        )
    }
}

/// Icon constants
pub struct Icons;

impl Icons {
    pub const INFO: &'static str = "ℹ";
    pub const SUCCESS: &'static str = "✓";

    pub fn for_style(style: NotificationStyle) -> &'static str {
        match style {
            NotificationStyle::Info => Self::INFO,
            NotificationStyle::Success => Self::SUCCESS,
        }
    }
}

//! User interface module - The transient status overlay

pub mod overlay;
pub mod theme;

pub use overlay::{ElementId, Notification, NotificationStyle, OverlaySurface, StatusOverlay};
pub use theme::{Icons, Rgb, Theme};

//! Status overlay - The single transient notification shown to the user

use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::debug;

use crate::core::event::Event;
use crate::core::schedule::{ScheduledTask, Scheduler};
use crate::ui::theme::Theme;

/// Identifier of one mounted notification element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "keepalive-status-{}", self.0)
    }
}

/// Visual style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    Info,
    Success,
}

impl NotificationStyle {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

/// Notification message
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub style: NotificationStyle,
    pub created_at: DateTime<Local>,
}

impl Notification {
    pub fn new(message: impl Into<String>, style: NotificationStyle) -> Self {
        Self {
            message: message.into(),
            style,
            created_at: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationStyle::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationStyle::Success)
    }
}

/// Host insertion point for the floating notification
pub trait OverlaySurface {
    /// Create and display a notification element styled by `inline_style`
    fn mount(&mut self, element: ElementId, notification: &Notification, inline_style: &str);
    /// Start the fade-out animation
    fn begin_fade(&mut self, element: ElementId);
    /// Physically remove the element
    fn remove(&mut self, element: ElementId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Shown,
    Fading,
}

/// The one rendered notification and the timers attached to it
struct OverlayHandle {
    element: ElementId,
    notification: Notification,
    phase: Phase,
    _expiry: Option<ScheduledTask>,
    _removal: Option<ScheduledTask>,
}

/// Owns the single overlay element.
///
/// `show` always destroys the current element before mounting a new one,
/// so a surface never holds two elements. Dropping the handle drops its
/// timers, which is how a `show` cancels a pending fade.
pub struct StatusOverlay<S> {
    surface: S,
    scheduler: Scheduler<Event>,
    fade: Duration,
    current: Option<OverlayHandle>,
    next_element: u64,
}

impl<S: OverlaySurface> StatusOverlay<S> {
    pub fn new(surface: S, scheduler: Scheduler<Event>, fade: Duration) -> Self {
        Self {
            surface,
            scheduler,
            fade,
            current: None,
            next_element: 0,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| handle.phase == Phase::Fading)
    }

    /// Replace whatever is shown with `notification`
    pub fn show(&mut self, notification: Notification) -> ElementId {
        self.destroy_current();

        self.next_element += 1;
        let element = ElementId(self.next_element);
        let style = Theme::inline_style(notification.style, self.fade);
        self.surface.mount(element, &notification, &style);
        debug!(
            element = %element,
            style = notification.style.label(),
            message = %notification.message,
            "Notification shown"
        );

        self.current = Some(OverlayHandle {
            element,
            notification,
            phase: Phase::Shown,
            _expiry: None,
            _removal: None,
        });
        element
    }

    /// Show `notification` and hide it again after `linger`
    pub fn show_transient(&mut self, notification: Notification, linger: Duration) -> ElementId {
        let element = self.show(notification);
        let expiry = self.scheduler.after(linger, Event::OverlayExpired { element });
        if let Some(handle) = self.current.as_mut() {
            handle._expiry = Some(expiry);
        }
        element
    }

    /// Start fading out the current notification. Removal follows after
    /// the fade delay. No-op when nothing is shown or already fading.
    pub fn hide(&mut self) {
        let Some(handle) = self.current.as_mut() else {
            return;
        };
        if handle.phase == Phase::Fading {
            return;
        }

        self.surface.begin_fade(handle.element);
        handle.phase = Phase::Fading;
        handle._expiry = None;
        handle._removal = Some(self.scheduler.after(
            self.fade,
            Event::OverlayFaded {
                element: handle.element,
            },
        ));
        debug!(element = %handle.element, "Notification fading");
    }

    pub fn on_expired(&mut self, element: ElementId) {
        if self.is_current(element) {
            self.hide();
        }
    }

    pub fn on_faded(&mut self, element: ElementId) {
        if self.is_current(element) && self.is_fading() {
            self.destroy_current();
        }
    }

    /// Remove the element immediately, skipping the fade
    pub fn clear(&mut self) {
        self.destroy_current();
    }

    fn is_current(&self, element: ElementId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| handle.element == element)
    }

    fn destroy_current(&mut self) {
        if let Some(handle) = self.current.take() {
            self.surface.remove(handle.element);
            debug!(
                element = %handle.element,
                message = %handle.notification.message,
                "Notification removed"
            );
        }
    }
}

//! Console host - Prints overlay notifications to a terminal

use std::io::{IsTerminal, Stdout, Write};
use tracing::{debug, trace, warn};

use crate::ui::{ElementId, Icons, Notification, OverlaySurface, Theme};

/// Overlay surface that writes one line per notification
pub struct ConsoleSurface<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleSurface<Stdout> {
    /// Write to stdout, colored when it is a terminal
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }
}

impl<W: Write> OverlaySurface for ConsoleSurface<W> {
    /// Terminals can't take the inline style; the theme's ANSI colors
    /// stand in for it
    fn mount(&mut self, element: ElementId, notification: &Notification, inline_style: &str) {
        trace!(element = %element, style = inline_style, "Mounting console notification");
        let line = format_line(notification, self.color);
        let written = writeln!(self.out, "{}", line).and_then(|_| self.out.flush());
        if let Err(err) = written {
            warn!(element = %element, error = %err, "Failed to write notification");
        }
    }

    fn begin_fade(&mut self, element: ElementId) {
        debug!(element = %element, "Console notification fading");
    }

    fn remove(&mut self, element: ElementId) {
        debug!(element = %element, "Console notification removed");
    }
}

fn format_line(notification: &Notification, color: bool) -> String {
    let time = notification.created_at.format("%H:%M:%S");
    let icon = Icons::for_style(notification.style);

    if !color {
        return format!("[{}] {} {}", time, icon, notification.message);
    }

    let accent = Theme::accent(notification.style);
    format!(
        "{}[{}]{} {}{}{} {}{}{}",
        Theme::TEXT_MUTED.ansi_fg(),
        time,
        Theme::RESET,
        accent.ansi_fg(),
        icon,
        Theme::RESET,
        Theme::TEXT_PRIMARY.ansi_fg(),
        notification.message,
        Theme::RESET
    )
}

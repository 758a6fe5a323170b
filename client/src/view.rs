//! Display capability handles
//!
//! The controller never knows what it renders to. It is handed a
//! `DashboardView` made of small handle traits; the optional ones may be
//! absent and every render step checks before touching them.

use crate::feed::LogEntry;
use std::fmt;

/// Visual state of the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorClass {
    Connected,
    #[default]
    Disconnected,
}

impl IndicatorClass {
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }

    /// Infer the class from a rendered class list such as
    /// `"status-indicator connected"`. Anything without the exact
    /// `connected` token counts as disconnected.
    pub fn from_class_list(classes: &str) -> Self {
        Self::from_connected(classes.split_whitespace().any(|c| c == "connected"))
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for IndicatorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status indicator whose class toggles between connected and disconnected
pub trait IndicatorHandle: Send {
    fn class(&self) -> IndicatorClass;
    fn set_class(&mut self, class: IndicatorClass);
}

/// Any element that shows a line of text
pub trait TextHandle: Send {
    fn set_text(&mut self, text: &str);
}

/// An enable/disable-able control (connect or disconnect button)
pub trait ControlHandle: Send {
    fn is_disabled(&self) -> bool;
    fn set_disabled(&mut self, disabled: bool);
}

/// Scrolling container of log entries
pub trait LogHandle: Send {
    fn append(&mut self, entry: LogEntry);
    fn scroll_to_latest(&mut self);
}

/// Everything the controller may render to
pub struct DashboardView {
    pub indicator: Box<dyn IndicatorHandle>,
    pub status_text: Box<dyn TextHandle>,
    pub connect_control: Box<dyn ControlHandle>,
    pub disconnect_control: Box<dyn ControlHandle>,
    pub elapsed: Option<Box<dyn TextHandle>>,
    pub log: Option<Box<dyn LogHandle>>,
    pub last_updated: Option<Box<dyn TextHandle>>,
}

impl DashboardView {
    /// Label shown in the status text element
    pub fn status_label(connected: bool) -> &'static str {
        if connected { "Connected" } else { "Not connected" }
    }

    /// Indicator, status text and the mutually exclusive controls
    pub fn render_connection(&mut self, connected: bool) {
        self.indicator.set_class(IndicatorClass::from_connected(connected));
        self.status_text.set_text(Self::status_label(connected));
        self.connect_control.set_disabled(connected);
        self.disconnect_control.set_disabled(!connected);
    }

    pub fn show_elapsed(&mut self, seconds: u64) {
        if let Some(elapsed) = self.elapsed.as_mut() {
            elapsed.set_text(&seconds.to_string());
        }
    }

    pub fn show_last_updated(&mut self, label: &str) {
        if let Some(last_updated) = self.last_updated.as_mut() {
            last_updated.set_text(label);
        }
    }

    /// Append and scroll; returns false when there is no log surface
    pub fn push_log(&mut self, entry: LogEntry) -> bool {
        match self.log.as_mut() {
            Some(log) => {
                log.append(entry);
                log.scroll_to_latest();
                true
            }
            None => false,
        }
    }
}

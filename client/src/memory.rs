//! Shared in-memory display handles
//!
//! Each handle is a cheap clone over the same cell, so one copy can be given
//! to the controller while another is kept to read what was rendered.

use crate::feed::LogEntry;
use crate::view::{
    ControlHandle, DashboardView, IndicatorClass, IndicatorHandle, LogHandle, TextHandle,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct SharedIndicator(Arc<Mutex<IndicatorClass>>);

impl SharedIndicator {
    pub fn new(class: IndicatorClass) -> Self {
        Self(Arc::new(Mutex::new(class)))
    }

    pub fn get(&self) -> IndicatorClass {
        *self.0.lock()
    }
}

impl IndicatorHandle for SharedIndicator {
    fn class(&self) -> IndicatorClass {
        self.get()
    }

    fn set_class(&mut self, class: IndicatorClass) {
        *self.0.lock() = class;
    }
}

#[derive(Clone, Default)]
pub struct SharedText(Arc<Mutex<String>>);

impl SharedText {
    pub fn get(&self) -> String {
        self.0.lock().clone()
    }
}

impl TextHandle for SharedText {
    fn set_text(&mut self, text: &str) {
        let mut current = self.0.lock();
        current.clear();
        current.push_str(text);
    }
}

#[derive(Clone, Default)]
pub struct SharedControl(Arc<Mutex<bool>>);

impl SharedControl {
    pub fn disabled(&self) -> bool {
        *self.0.lock()
    }
}

impl ControlHandle for SharedControl {
    fn is_disabled(&self) -> bool {
        self.disabled()
    }

    fn set_disabled(&mut self, disabled: bool) {
        *self.0.lock() = disabled;
    }
}

#[derive(Default)]
struct LogState {
    entries: VecDeque<LogEntry>,
    limit: Option<usize>,
    scrolled: bool,
}

/// Log surface keeping its entries in order, optionally capped
#[derive(Clone, Default)]
pub struct SharedLog(Arc<Mutex<LogState>>);

impl SharedLog {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self(Arc::new(Mutex::new(LogState {
            limit,
            ..LogState::default()
        })))
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.0.lock().entries.iter().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0
            .lock()
            .entries
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the newest entry is the one in view
    pub fn at_latest(&self) -> bool {
        self.0.lock().scrolled
    }
}

impl LogHandle for SharedLog {
    fn append(&mut self, entry: LogEntry) {
        let mut state = self.0.lock();
        state.entries.push_back(entry);
        if let Some(limit) = state.limit {
            while state.entries.len() > limit {
                state.entries.pop_front();
            }
        }
        state.scrolled = false;
    }

    fn scroll_to_latest(&mut self) {
        self.0.lock().scrolled = true;
    }
}

/// A complete set of shared handles
#[derive(Clone, Default)]
pub struct MemoryView {
    pub indicator: SharedIndicator,
    pub status_text: SharedText,
    pub connect_control: SharedControl,
    pub disconnect_control: SharedControl,
    pub elapsed: SharedText,
    pub log: SharedLog,
    pub last_updated: SharedText,
}

impl MemoryView {
    pub fn new(initial: IndicatorClass, log_limit: Option<usize>) -> Self {
        Self {
            indicator: SharedIndicator::new(initial),
            log: SharedLog::with_limit(log_limit),
            ..Self::default()
        }
    }

    /// View with every optional surface present
    pub fn view(&self) -> DashboardView {
        DashboardView {
            elapsed: Some(Box::new(self.elapsed.clone())),
            log: Some(Box::new(self.log.clone())),
            last_updated: Some(Box::new(self.last_updated.clone())),
            ..self.bare_view()
        }
    }

    /// View with only the required surfaces
    pub fn bare_view(&self) -> DashboardView {
        DashboardView {
            indicator: Box::new(self.indicator.clone()),
            status_text: Box::new(self.status_text.clone()),
            connect_control: Box::new(self.connect_control.clone()),
            disconnect_control: Box::new(self.disconnect_control.clone()),
            elapsed: None,
            log: None,
            last_updated: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let text = SharedText::default();
        let mut handle = text.clone();
        handle.set_text("Connected");
        assert_eq!(text.get(), "Connected");
    }

    #[test]
    fn test_log_limit_drops_oldest() {
        let log = SharedLog::with_limit(Some(2));
        let mut handle = log.clone();
        for i in 0..3 {
            handle.append(LogEntry::at("00:00:00", format!("line {i}")));
        }
        assert_eq!(log.messages(), vec!["line 1", "line 2"]);
    }

    #[test]
    fn test_append_then_scroll() {
        let log = SharedLog::default();
        let mut handle = log.clone();
        handle.append(LogEntry::at("00:00:00", "a"));
        assert!(!log.at_latest());
        handle.scroll_to_latest();
        assert!(log.at_latest());
    }

    #[test]
    fn test_bare_view_has_no_optional_surfaces() {
        let view = MemoryView::default().bare_view();
        assert!(view.elapsed.is_none());
        assert!(view.log.is_none());
        assert!(view.last_updated.is_none());
    }
}

//! Terminal rendering of the dashboard

use crate::feed::LogEntry;
use crate::memory::{SharedControl, SharedIndicator, SharedLog, SharedText};
use crate::view::{
    ControlHandle, DashboardView, IndicatorClass, IndicatorHandle, LogHandle, TextHandle,
};
use tracing::{debug, trace};

/// Prints `label: text` whenever the text actually changes
struct ConsoleText {
    label: &'static str,
    inner: SharedText,
    quiet: bool,
}

impl TextHandle for ConsoleText {
    fn set_text(&mut self, text: &str) {
        if self.inner.get() == text {
            return;
        }
        self.inner.set_text(text);
        if self.quiet {
            trace!("{}: {}", self.label, text);
        } else {
            println!("{}: {}", self.label, text);
        }
    }
}

struct ConsoleIndicator(SharedIndicator);

impl IndicatorHandle for ConsoleIndicator {
    fn class(&self) -> IndicatorClass {
        self.0.get()
    }

    fn set_class(&mut self, class: IndicatorClass) {
        if self.0.get() != class {
            debug!("Indicator -> {}", class);
        }
        self.0.set_class(class);
    }
}

/// Shows which command is currently accepted
struct ConsoleControl {
    command: &'static str,
    inner: SharedControl,
}

impl ControlHandle for ConsoleControl {
    fn is_disabled(&self) -> bool {
        self.inner.disabled()
    }

    fn set_disabled(&mut self, disabled: bool) {
        let was = self.inner.disabled();
        self.inner.set_disabled(disabled);
        if was && !disabled {
            println!("  (type '{}' to {})", self.command, self.command);
        }
    }
}

struct ConsoleLog(SharedLog);

impl LogHandle for ConsoleLog {
    fn append(&mut self, entry: LogEntry) {
        println!("{}", entry);
        self.0.append(entry);
    }

    fn scroll_to_latest(&mut self) {
        self.0.scroll_to_latest();
    }
}

/// Build a view that renders to stdout.
///
/// Both controls start disabled so the first render prints the hint for
/// whichever one becomes actionable.
pub fn console_view(initial: IndicatorClass, log_limit: Option<usize>) -> DashboardView {
    let mut connect = SharedControl::default();
    connect.set_disabled(true);
    let mut disconnect = SharedControl::default();
    disconnect.set_disabled(true);

    DashboardView {
        indicator: Box::new(ConsoleIndicator(SharedIndicator::new(initial))),
        status_text: Box::new(ConsoleText {
            label: "Status",
            inner: SharedText::default(),
            quiet: false,
        }),
        connect_control: Box::new(ConsoleControl {
            command: "connect",
            inner: connect,
        }),
        disconnect_control: Box::new(ConsoleControl {
            command: "disconnect",
            inner: disconnect,
        }),
        elapsed: Some(Box::new(ConsoleText {
            label: "Active seconds",
            inner: SharedText::default(),
            quiet: true,
        })),
        log: Some(Box::new(ConsoleLog(SharedLog::with_limit(log_limit)))),
        last_updated: Some(Box::new(ConsoleText {
            label: "Last updated",
            inner: SharedText::default(),
            quiet: true,
        })),
    }
}

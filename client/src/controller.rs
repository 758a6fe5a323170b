//! Dashboard controller
//!
//! Owns the connection flag, the session timer and the view. Requests run on
//! spawned tasks and report back through a `Completion` channel; the owner of
//! the receiver feeds them to [`DashboardController::apply`] on the same task
//! that drives timers and host events, so state is only ever touched from one
//! place.
//!
//! Connection state changes only when a status poll says so. A successful
//! connect or disconnect just triggers another poll.

use crate::api::ControlApi;
use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::feed::LogEntry;
use crate::timer::SessionTimer;
use crate::view::DashboardView;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vpndash_protocol::{ActionResponse, StatusResponse};

/// Last state reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub connected: bool,
    pub last_updated_label: String,
}

/// User-triggered actions against the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Disconnect,
}

impl Action {
    fn noun(self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::Disconnect => "Disconnect",
        }
    }
}

/// Result of a request, delivered back to the controller's task
#[derive(Debug)]
pub enum Completion {
    Status {
        seq: u64,
        result: Result<StatusResponse, ApiError>,
    },
    Action {
        action: Action,
        result: Result<ActionResponse, ApiError>,
    },
}

pub type Completions = mpsc::UnboundedReceiver<Completion>;

pub struct DashboardController {
    api: Arc<dyn ControlApi>,
    view: DashboardView,
    state: ConnectionState,
    timer: SessionTimer,
    completions: mpsc::UnboundedSender<Completion>,
    /// Sequence number of the last poll issued
    issued_poll: u64,
    /// Sequence number of the newest poll whose answer was applied
    applied_poll: u64,
}

impl DashboardController {
    /// Build the controller and the channel its requests report on.
    ///
    /// The initial connection flag is read from the view's indicator, and the
    /// controls are rendered from it right away.
    pub fn new(
        api: Arc<dyn ControlApi>,
        mut view: DashboardView,
        session: &SessionConfig,
    ) -> (Self, Completions) {
        let connected = view.indicator.class().is_connected();
        view.render_connection(connected);

        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            api,
            view,
            state: ConnectionState {
                connected,
                last_updated_label: String::new(),
            },
            timer: SessionTimer::new(session.tick_interval(), session.keep_alive_every),
            completions: tx,
            issued_poll: 0,
            applied_poll: 0,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    pub fn session_elapsed(&self) -> Option<u64> {
        self.timer.elapsed()
    }

    pub fn session_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Issue `GET /api/status`
    pub fn poll_status(&mut self) {
        self.issued_poll += 1;
        let seq = self.issued_poll;
        let api = Arc::clone(&self.api);
        let tx = self.completions.clone();
        debug!(seq, "Polling status");

        tokio::spawn(async move {
            let result = api.status().await;
            let _ = tx.send(Completion::Status { seq, result });
        });
    }

    /// Issue `POST /api/connect`
    pub fn connect(&mut self) {
        self.request(Action::Connect);
    }

    /// Issue `POST /api/disconnect`
    pub fn disconnect(&mut self) {
        self.request(Action::Disconnect);
    }

    /// Connect only if the connect control is currently actionable
    pub fn press_connect(&mut self) -> bool {
        if self.view.connect_control.is_disabled() {
            debug!("Connect control is disabled, ignoring");
            return false;
        }
        self.connect();
        true
    }

    /// Disconnect only if the disconnect control is currently actionable
    pub fn press_disconnect(&mut self) -> bool {
        if self.view.disconnect_control.is_disabled() {
            debug!("Disconnect control is disabled, ignoring");
            return false;
        }
        self.disconnect();
        true
    }

    fn request(&mut self, action: Action) {
        let api = Arc::clone(&self.api);
        let tx = self.completions.clone();
        debug!(?action, "Sending request");

        tokio::spawn(async move {
            let result = match action {
                Action::Connect => api.connect().await,
                Action::Disconnect => api.disconnect().await,
            };
            let _ = tx.send(Completion::Action { action, result });
        });
    }

    /// Fire-and-forget `POST /api/keep_alive`, only while connected.
    ///
    /// Returns the request task so callers that are about to exit can wait
    /// for it.
    pub fn send_keep_alive(&self) -> Option<JoinHandle<()>> {
        if !self.state.connected {
            return None;
        }
        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            if let Err(e) = api.keep_alive().await {
                warn!("Keep-alive request failed: {}", e);
            }
        }))
    }

    /// Start the session count at zero. Suppressed while already running.
    pub fn start_session_timer(&mut self) -> bool {
        if !self.timer.start() {
            return false;
        }
        self.view.show_elapsed(0);
        true
    }

    /// Stop the session count. No-op when not running.
    pub fn stop_session_timer(&mut self) -> Option<u64> {
        self.timer.stop()
    }

    /// Wait for the next session timer tick; pending forever while stopped
    pub async fn next_session_tick(&mut self) -> u64 {
        self.timer.tick().await
    }

    /// Show the new count and send a keep-alive when one is due
    pub fn on_session_tick(&mut self, elapsed: u64) -> Option<JoinHandle<()>> {
        self.view.show_elapsed(elapsed);
        if self.timer.keep_alive_due(elapsed) {
            debug!(elapsed, "Session keep-alive due");
            self.send_keep_alive()
        } else {
            None
        }
    }

    /// The dashboard came back into view
    pub fn on_visible(&mut self) -> Option<JoinHandle<()>> {
        self.poll_status();
        self.send_keep_alive()
    }

    /// The dashboard is going away; one last keep-alive if connected
    pub fn on_unload(&self) -> Option<JoinHandle<()>> {
        self.send_keep_alive()
    }

    /// Append a locally timestamped line to the log surface, if any
    pub fn append_log(&mut self, message: impl Into<String>) {
        self.view.push_log(LogEntry::now(message));
    }

    /// Apply a finished request
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Status { seq, result } => self.on_status(seq, result),
            Completion::Action { action, result } => self.on_action(action, result),
        }
    }

    fn on_status(&mut self, seq: u64, result: Result<StatusResponse, ApiError>) {
        let status = match result {
            Ok(status) => status,
            Err(e) => {
                warn!("Status check failed: {}", e);
                self.append_log(format!("Status check failed: {}", e));
                return;
            }
        };

        if seq < self.applied_poll {
            debug!(seq, newest = self.applied_poll, "Dropping stale status answer");
            return;
        }
        self.applied_poll = seq;

        let was_connected = self.state.connected;
        self.state = ConnectionState {
            connected: status.connected,
            last_updated_label: status.last_updated,
        };
        let connected = self.state.connected;
        if was_connected != connected {
            info!(connected, "Connection state changed");
        }

        self.view.render_connection(connected);
        self.view.push_log(LogEntry::at(
            self.state.last_updated_label.clone(),
            format!("Status: {}", DashboardView::status_label(connected)),
        ));
        self.view.show_last_updated(&self.state.last_updated_label);

        if connected {
            if self.start_session_timer() {
                info!("Session timer started");
            }
        } else if let Some(elapsed) = self.stop_session_timer() {
            info!(elapsed, "Session timer stopped");
        }
    }

    fn on_action(&mut self, action: Action, result: Result<ActionResponse, ApiError>) {
        let noun = action.noun();
        match result {
            Ok(resp) if resp.success => {
                info!("{} request succeeded: {}", noun, resp.message);
                self.append_log(format!("{} request succeeded: {}", noun, resp.message));
                self.poll_status();
            }
            Ok(resp) => {
                warn!("{} failed: {}", noun, resp.message);
                self.append_log(format!("{} failed: {}", noun, resp.message));
            }
            Err(e) => {
                warn!("{} request failed: {}", noun, e);
                self.append_log(format!("{} request failed: {}", noun, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::{ScriptedApi, unavailable};
    use crate::memory::MemoryView;
    use crate::view::IndicatorClass;
    use std::time::Duration;
    use tokio::time::timeout;
    use vpndash_protocol::Endpoint;

    struct Harness {
        api: Arc<ScriptedApi>,
        screen: MemoryView,
        controller: DashboardController,
        completions: Completions,
    }

    impl Harness {
        fn new(initial: IndicatorClass) -> Self {
            let screen = MemoryView::new(initial, None);
            Self::with_view(screen.clone(), screen.view())
        }

        fn with_view(screen: MemoryView, view: DashboardView) -> Self {
            let api = Arc::new(ScriptedApi::default());
            let (controller, completions) =
                DashboardController::new(api.clone(), view, &SessionConfig::default());
            Self {
                api,
                screen,
                controller,
                completions,
            }
        }

        /// Apply exactly one completion
        async fn step(&mut self) {
            let completion = self.completions.recv().await.unwrap();
            self.controller.apply(completion);
        }

        /// Apply completions until none arrive for a while
        async fn settle(&mut self) {
            while let Ok(Some(completion)) =
                timeout(Duration::from_millis(50), self.completions.recv()).await
            {
                self.controller.apply(completion);
            }
        }

        fn calls(&self) -> (usize, usize, usize, usize) {
            (
                ScriptedApi::count(&self.api.status_calls),
                ScriptedApi::count(&self.api.connect_calls),
                ScriptedApi::count(&self.api.disconnect_calls),
                ScriptedApi::count(&self.api.keep_alive_calls),
            )
        }

        fn assert_controls_match(&self, connected: bool) {
            assert_eq!(self.screen.connect_control.disabled(), connected);
            assert_eq!(self.screen.disconnect_control.disabled(), !connected);
        }
    }

    #[tokio::test]
    async fn test_initial_disconnected_render() {
        let h = Harness::new(IndicatorClass::Disconnected);

        assert!(!h.controller.is_connected());
        h.assert_controls_match(false);
        assert!(!h.controller.session_running());
        assert!(h.screen.log.is_empty());
    }

    #[tokio::test]
    async fn test_initial_connected_indicator_does_not_start_timer() {
        let h = Harness::new(IndicatorClass::Connected);

        assert!(h.controller.is_connected());
        h.assert_controls_match(true);
        assert!(!h.controller.session_running());
    }

    #[tokio::test]
    async fn test_poll_reflects_both_states() {
        let mut h = Harness::new(IndicatorClass::Disconnected);

        for connected in [true, false, true, true, false] {
            h.api
                .push_status(Ok(StatusResponse::new(connected, "2024-05-01 12:00:00")));
            h.controller.poll_status();
            h.step().await;

            assert_eq!(h.controller.is_connected(), connected);
            assert_eq!(h.screen.indicator.get().is_connected(), connected);
            assert_eq!(h.screen.status_text.get(), DashboardView::status_label(connected));
            h.assert_controls_match(connected);
        }
    }

    #[tokio::test]
    async fn test_poll_logs_with_server_timestamp() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));
        h.controller.poll_status();
        h.step().await;

        let entries = h.screen.log.entries();
        assert_eq!(entries, vec![LogEntry::at("12:00:00", "Status: Connected")]);
        assert!(h.screen.log.at_latest());
        assert_eq!(h.screen.last_updated.get(), "12:00:00");
        assert_eq!(h.controller.state().last_updated_label, "12:00:00");
    }

    #[tokio::test]
    async fn test_poll_failure_keeps_state() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));
        h.controller.poll_status();
        h.step().await;

        h.api.push_status(Err(unavailable(Endpoint::Status)));
        h.controller.poll_status();
        h.step().await;

        assert!(h.controller.is_connected());
        h.assert_controls_match(true);
        assert!(h.controller.session_running());
        let messages = h.screen.log.messages();
        assert!(messages[1].starts_with("Status check failed: GET /api/status"));
    }

    #[tokio::test]
    async fn test_stale_status_is_dropped() {
        let mut h = Harness::new(IndicatorClass::Disconnected);

        // Deliver the newer answer first, then the older one
        h.controller.apply(Completion::Status {
            seq: 2,
            result: Ok(StatusResponse::new(true, "12:00:10")),
        });
        h.controller.apply(Completion::Status {
            seq: 1,
            result: Ok(StatusResponse::new(false, "12:00:05")),
        });

        assert!(h.controller.is_connected());
        assert_eq!(h.controller.state().last_updated_label, "12:00:10");
    }

    #[tokio::test]
    async fn test_connect_success_logs_then_polls() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_connect(Ok(ActionResponse::ok("ok")));
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));

        h.controller.connect();
        h.step().await;
        assert_eq!(h.screen.log.messages(), vec!["Connect request succeeded: ok"]);
        // Not connected yet: only the follow-up poll may flip the flag
        assert!(!h.controller.is_connected());

        h.step().await;
        assert!(h.controller.is_connected());
        assert_eq!(h.calls(), (1, 1, 0, 0));
        assert_eq!(
            h.screen.log.messages(),
            vec!["Connect request succeeded: ok", "Status: Connected"]
        );
    }

    #[tokio::test]
    async fn test_connect_failure_does_not_poll() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_connect(Ok(ActionResponse::failed("no config")));

        h.controller.connect();
        h.settle().await;

        assert_eq!(h.screen.log.messages(), vec!["Connect failed: no config"]);
        assert_eq!(h.calls(), (0, 1, 0, 0));
        h.assert_controls_match(false);
    }

    #[tokio::test]
    async fn test_disconnect_failure_does_not_poll() {
        let mut h = Harness::new(IndicatorClass::Connected);
        h.api.push_disconnect(Ok(ActionResponse::failed("busy")));

        h.controller.disconnect();
        h.settle().await;

        assert_eq!(h.screen.log.messages(), vec!["Disconnect failed: busy"]);
        assert_eq!(h.calls(), (0, 0, 1, 0));
        assert!(h.controller.is_connected());
    }

    #[tokio::test]
    async fn test_action_transport_failure() {
        let mut h = Harness::new(IndicatorClass::Connected);
        h.controller.disconnect();
        h.settle().await;

        let messages = h.screen.log.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Disconnect request failed: POST /api/disconnect"));
        assert_eq!(h.calls(), (0, 0, 1, 0));
    }

    #[tokio::test]
    async fn test_pressing_disabled_control_is_ignored() {
        let mut h = Harness::new(IndicatorClass::Disconnected);

        assert!(!h.controller.press_disconnect());
        h.api.push_connect(Ok(ActionResponse::failed("nope")));
        assert!(h.controller.press_connect());
        h.settle().await;

        assert_eq!(h.calls(), (0, 1, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connected_poll_starts_timer_and_keeps_alive() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));
        h.controller.poll_status();
        h.step().await;

        assert_eq!(h.controller.session_elapsed(), Some(0));
        assert_eq!(h.screen.elapsed.get(), "0");

        for expected in 1..=5u64 {
            let elapsed = h.controller.next_session_tick().await;
            assert_eq!(elapsed, expected);
            let keep_alive = h.controller.on_session_tick(elapsed);
            assert_eq!(keep_alive.is_some(), expected == 5);
            if let Some(handle) = keep_alive {
                handle.await.unwrap();
            }
        }

        assert_eq!(h.screen.elapsed.get(), "5");
        assert_eq!(ScriptedApi::count(&h.api.keep_alive_calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_connected_polls_keep_one_timer() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));
        h.controller.poll_status();
        h.step().await;

        let elapsed = h.controller.next_session_tick().await;
        h.controller.on_session_tick(elapsed);
        let elapsed = h.controller.next_session_tick().await;
        h.controller.on_session_tick(elapsed);

        h.api.push_status(Ok(StatusResponse::new(true, "12:00:02")));
        h.controller.poll_status();
        h.step().await;

        assert!(!h.controller.start_session_timer());
        assert_eq!(h.controller.session_elapsed(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_poll_stops_timer() {
        let mut h = Harness::new(IndicatorClass::Disconnected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));
        h.controller.poll_status();
        h.step().await;
        let elapsed = h.controller.next_session_tick().await;
        h.controller.on_session_tick(elapsed);

        h.api.push_status(Ok(StatusResponse::new(false, "12:00:01")));
        h.controller.poll_status();
        h.step().await;

        assert!(!h.controller.session_running());
        assert_eq!(h.controller.session_elapsed(), None);
        assert_eq!(h.controller.stop_session_timer(), None);
    }

    #[tokio::test]
    async fn test_keep_alive_never_sent_while_disconnected() {
        let mut h = Harness::new(IndicatorClass::Disconnected);

        assert!(h.controller.send_keep_alive().is_none());
        assert!(h.controller.on_unload().is_none());
        assert!(h.controller.on_session_tick(5).is_none());
        assert!(h.controller.on_visible().is_none());
        h.settle().await;

        assert_eq!(ScriptedApi::count(&h.api.keep_alive_calls), 0);
    }

    #[tokio::test]
    async fn test_visible_polls_and_keeps_alive_when_connected() {
        let mut h = Harness::new(IndicatorClass::Connected);
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));

        let keep_alive = h.controller.on_visible().unwrap();
        keep_alive.await.unwrap();
        h.step().await;

        assert_eq!(h.calls(), (1, 0, 0, 1));
    }

    #[tokio::test]
    async fn test_keep_alive_failure_stays_off_the_feed() {
        let h = Harness::new(IndicatorClass::Connected);
        h.api.fail_keep_alive();

        h.controller.on_unload().unwrap().await.unwrap();

        assert_eq!(ScriptedApi::count(&h.api.keep_alive_calls), 1);
        assert!(h.screen.log.is_empty());
    }

    #[tokio::test]
    async fn test_without_optional_surfaces() {
        let screen = MemoryView::new(IndicatorClass::Disconnected, None);
        let mut h = Harness::with_view(screen.clone(), screen.bare_view());
        h.api.push_status(Ok(StatusResponse::new(true, "12:00:00")));

        h.controller.append_log("ignored");
        h.controller.poll_status();
        h.step().await;

        assert!(h.controller.is_connected());
        h.assert_controls_match(true);
        assert!(h.screen.log.is_empty());
        assert_eq!(h.screen.last_updated.get(), "");
        assert_eq!(h.screen.elapsed.get(), "");
    }
}

//! Event loop driving the controller

use crate::config::DashboardConfig;
use crate::controller::{Completions, DashboardController};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, info, warn};

/// Input from the user or the hosting surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Connect control activated
    Connect,
    /// Disconnect control activated
    Disconnect,
    /// Dashboard became visible again
    Visible,
    /// Dashboard is about to go away
    Unload,
}

impl HostEvent {
    /// Map a typed terminal command to its event. Blank or unknown input
    /// maps to nothing.
    pub fn from_command(line: &str) -> Option<Self> {
        match line.trim() {
            "c" | "connect" => Some(Self::Connect),
            "d" | "disconnect" => Some(Self::Disconnect),
            "r" | "refresh" => Some(Self::Visible),
            "q" | "quit" => Some(Self::Unload),
            _ => None,
        }
    }
}

/// Timing of the event loop
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub poll_interval: Duration,
    pub unload_grace: Duration,
}

impl From<&DashboardConfig> for RunSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            poll_interval: config.polling.interval(),
            unload_grace: config.session.unload_grace(),
        }
    }
}

/// Run until `Unload` arrives or every host event sender is gone.
///
/// Polls immediately, then every `poll_interval`. On the way out a final
/// keep-alive is sent if connected and given `unload_grace` to finish.
pub async fn run(
    mut controller: DashboardController,
    mut completions: Completions,
    mut events: mpsc::Receiver<HostEvent>,
    settings: RunSettings,
) -> DashboardController {
    let mut poll = interval(settings.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Dashboard running, polling every {}s",
        settings.poll_interval.as_secs_f64()
    );

    loop {
        tokio::select! {
            _ = poll.tick() => controller.poll_status(),
            elapsed = controller.next_session_tick() => {
                controller.on_session_tick(elapsed);
            }
            Some(completion) = completions.recv() => controller.apply(completion),
            event = events.recv() => match event {
                Some(HostEvent::Connect) => {
                    controller.press_connect();
                }
                Some(HostEvent::Disconnect) => {
                    controller.press_disconnect();
                }
                Some(HostEvent::Visible) => {
                    controller.on_visible();
                }
                Some(HostEvent::Unload) | None => break,
            },
        }
    }

    debug!("Unloading dashboard");
    if let Some(keep_alive) = controller.on_unload() {
        if timeout(settings.unload_grace, keep_alive).await.is_err() {
            warn!("Final keep-alive did not finish within {:?}", settings.unload_grace);
        }
    }
    controller
}

//! vpndash Client Library
//!
//! Dashboard controller for a VPN control server: polls connection status,
//! renders it through injected display handles, issues connect/disconnect
//! requests and keeps the server-side session alive while connected.

pub mod api;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod feed;
pub mod memory;
pub mod runtime;
pub mod timer;
pub mod view;

pub use api::{ControlApi, HttpControlApi};
pub use config::DashboardConfig;
pub use controller::{Completion, Completions, ConnectionState, DashboardController};
pub use error::ApiError;
pub use runtime::{HostEvent, RunSettings, run};
pub use view::{DashboardView, IndicatorClass};

//! vpndash Protocol - Control API definitions
//!
//! This crate defines the JSON payloads exchanged with the VPN control server:
//! - `StatusResponse`: Authoritative connection state from `GET /api/status`
//! - `ActionResponse`: Outcome of `POST /api/connect` and `POST /api/disconnect`
//! - `KeepAliveResponse`: Acknowledgement of `POST /api/keep_alive`
//! - `Endpoint`: Method and path of every route the dashboard consumes
//!
//! All payloads use serde and tolerate fields they do not know about.

mod endpoint;
mod message;

pub use endpoint::*;
pub use message::*;

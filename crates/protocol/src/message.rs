//! Response payloads

use serde::{Deserialize, Serialize};

/// Body of `GET /api/status`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    /// Whether the tunnel is up
    pub connected: bool,

    /// Server-side wall clock at the time of the check ("%Y-%m-%d %H:%M:%S")
    pub last_updated: String,

    /// Raw status word reported by the server ("connected", "disconnected")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StatusResponse {
    pub fn new(connected: bool, last_updated: impl Into<String>) -> Self {
        let status = if connected { "connected" } else { "disconnected" };
        Self {
            connected,
            last_updated: last_updated.into(),
            status: Some(status.to_string()),
        }
    }
}

/// Body of `POST /api/connect` and `POST /api/disconnect`
///
/// The server answers failures with HTTP 500 and this same body, so the
/// `success` flag is what decides the outcome, not the status code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Body of `POST /api/keep_alive`. The dashboard never inspects it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepAliveResponse {
    #[serde(default)]
    pub success: bool,
}

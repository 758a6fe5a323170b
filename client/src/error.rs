//! Request errors

use thiserror::Error;
use vpndash_protocol::Endpoint;

/// A request that never produced a usable body.
///
/// Application-level refusals (`success: false`) are not errors; they arrive
/// as a decoded `ActionResponse`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint}: unexpected response body (HTTP {status}): {source}")]
    Decode {
        endpoint: Endpoint,
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. } | Self::Decode { endpoint, .. } => *endpoint,
        }
    }
}

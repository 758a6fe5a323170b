//! Control API client
//!
//! `ControlApi` is the seam between the controller and the server: the
//! controller only ever talks to this trait, `HttpControlApi` is the reqwest
//! implementation used by the binaries.

use crate::config::ApiConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use vpndash_protocol::{ActionResponse, Endpoint, KeepAliveResponse, Method, StatusResponse};

/// Requests the dashboard issues against the control server
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// `GET /api/status`
    async fn status(&self) -> Result<StatusResponse, ApiError>;

    /// `POST /api/connect`
    async fn connect(&self) -> Result<ActionResponse, ApiError>;

    /// `POST /api/disconnect`
    async fn disconnect(&self) -> Result<ActionResponse, ApiError>;

    /// `POST /api/keep_alive`
    async fn keep_alive(&self) -> Result<(), ApiError>;
}

/// reqwest-backed control API client
#[derive(Clone)]
pub struct HttpControlApi {
    client: Client,
    base_url: String,
}

impl HttpControlApi {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a bodyless request and decode the JSON answer.
    ///
    /// The body is decoded whatever the HTTP status: failed actions come back
    /// as 500 with a regular `{success, message}` payload.
    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let url = endpoint.url(&self.base_url);
        let request = match endpoint.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        let resp = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint,
            status,
            source,
        })
    }
}

#[async_trait]
impl ControlApi for HttpControlApi {
    async fn status(&self) -> Result<StatusResponse, ApiError> {
        self.call(Endpoint::Status).await
    }

    async fn connect(&self) -> Result<ActionResponse, ApiError> {
        self.call(Endpoint::Connect).await
    }

    async fn disconnect(&self) -> Result<ActionResponse, ApiError> {
        self.call(Endpoint::Disconnect).await
    }

    async fn keep_alive(&self) -> Result<(), ApiError> {
        self.call::<KeepAliveResponse>(Endpoint::KeepAlive).await?;
        Ok(())
    }
}

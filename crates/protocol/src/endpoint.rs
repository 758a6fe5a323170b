//! Control API routes

use std::fmt;

/// HTTP method used by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Routes exposed by the control server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /api/status`
    Status,
    /// `POST /api/connect`
    Connect,
    /// `POST /api/disconnect`
    Disconnect,
    /// `POST /api/keep_alive`
    KeepAlive,
}

impl Endpoint {
    /// Every route, in table order
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Status,
        Endpoint::Connect,
        Endpoint::Disconnect,
        Endpoint::KeepAlive,
    ];

    /// Request path relative to the server root
    pub const fn path(self) -> &'static str {
        match self {
            Self::Status => "/api/status",
            Self::Connect => "/api/connect",
            Self::Disconnect => "/api/disconnect",
            Self::KeepAlive => "/api/keep_alive",
        }
    }

    pub const fn method(self) -> Method {
        match self {
            Self::Status => Method::Get,
            Self::Connect | Self::Disconnect | Self::KeepAlive => Method::Post,
        }
    }

    /// Join this route onto a base URL such as `http://127.0.0.1:5000/`.
    ///
    /// Trailing slashes on the base are ignored so both spellings produce the
    /// same URL.
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_status_is_a_read() {
        for endpoint in Endpoint::ALL {
            let expected = if endpoint == Endpoint::Status {
                Method::Get
            } else {
                Method::Post
            };
            assert_eq!(endpoint.method(), expected, "{endpoint}");
        }
    }

    #[test]
    fn test_url_join() {
        assert_eq!(
            Endpoint::Status.url("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/api/status"
        );
        assert_eq!(
            Endpoint::KeepAlive.url("http://vpn.local/"),
            "http://vpn.local/api/keep_alive"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Endpoint::Disconnect.to_string(), "POST /api/disconnect");
    }
}

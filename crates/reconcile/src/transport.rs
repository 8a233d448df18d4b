//! Transport abstraction.
//!
//! The engine never talks HTTP directly; it goes through the [`Transport`]
//! trait so the binary can plug in a real client and tests can plug in a
//! recording double. Implementations encode every failure in the returned
//! status instead of erroring: `-1` means the server was never reached.

use serde_json::Value;
use std::fmt;

/// Status value used for transport-level failures (DNS, refused, timeout).
pub const STATUS_UNREACHABLE: i32 = -1;

/// HTTP method for a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether this method mutates server state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// Request payload. JSON bodies go out as `application/json`; a handful of
/// endpoints (change password, verify email, script run) want a raw string
/// as `text/plain`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// Uniform response shape: a status and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status, or [`STATUS_UNREACHABLE`] when the server was never
    /// reached.
    pub status: i32,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Build a response from a status and body.
    pub fn new(status: i32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A transport-failure response carrying the failure description.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_UNREACHABLE,
            body: message.into().into_bytes(),
        }
    }

    /// Whether the server was reached at all.
    pub fn is_reachable(&self) -> bool {
        self.status != STATUS_UNREACHABLE
    }

    /// Body as lossy UTF-8 for diagnostics.
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Decode the body as JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A client able to issue one authenticated request against the managed
/// server. One attempt per call; no retry or backoff.
pub trait Transport {
    /// Issue a single request. `path` is relative to the configured API
    /// base. Implementations must not panic or return early on network
    /// failure; they report it as status [`STATUS_UNREACHABLE`].
    fn request(&self, method: Method, path: &str, payload: Option<&Payload>) -> Response;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(&self, method: Method, path: &str, payload: Option<&Payload>) -> Response {
        (*self).request(method, path, payload)
    }
}

//! HTTP transport seam.
//!
//! # Design
//! Responses are plain data: the executor decides what a status or body
//! means, the transport only moves bytes. `UreqTransport` is the blocking
//! default; tests substitute their own `Transport` to count or script calls.
//!
//! Transport failures are split into "no response at all" and "response
//! arrived but its body could not be read", keeping the status of the latter
//! so a gateway timeout still wins over a body-read error.

use std::fmt;
use std::sync::Arc;

use ureq::Agent;

/// HTTP status the marketplace uses for upstream timeouts.
pub const STATUS_GATEWAY_TIMEOUT: u16 = 504;

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Why a GET produced no usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connection or I/O failure before a status was received.
    Request(String),

    /// A status was received but the body could not be read.
    Body { status: u16, message: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(msg) => f.write_str(msg),
            TransportError::Body { status, message } => {
                write!(f, "reading body of HTTP {status} response: {message}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Executes a single blocking GET.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

/// Blocking transport backed by a ureq [`Agent`].
///
/// Status codes are returned as data rather than errors so the executor can
/// see a 504. Redirects and timeouts keep ureq's defaults.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError::Body {
                status,
                message: e.to_string(),
            })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_error_display_includes_status() {
        let err = TransportError::Body {
            status: 200,
            message: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "reading body of HTTP 200 response: connection reset");
    }

    #[test]
    fn request_error_display_is_verbatim() {
        let err = TransportError::Request("dns error: no such host".to_string());
        assert_eq!(err.to_string(), "dns error: no such host");
    }
}

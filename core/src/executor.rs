//! Request executor and serialization gate.
//!
//! # Design
//! The marketplace does not tolerate concurrent requests from one account, so
//! every GET runs while holding a `SerialGate`. The gate is a value handed to
//! the executor rather than ambient state: `SerialGate::global()` is shared by
//! every client in the process, `SerialGate::new()` gives an independent one.
//!
//! Failure precedence for one call:
//! 1. transport failure before a status arrived,
//! 2. 504 Gateway Timeout, whatever the body,
//! 3. body-read failure,
//! 4. an `error` field in the response envelope,
//! 5. otherwise the raw body is returned for a second, typed decode.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{Transport, TransportError, STATUS_GATEWAY_TIMEOUT};

static GLOBAL_GATE: LazyLock<SerialGate> = LazyLock::new(SerialGate::new);

/// Mutual-exclusion token: at most one request in flight per gate.
#[derive(Debug, Clone, Default)]
pub struct SerialGate {
    lock: Arc<Mutex<()>>,
}

impl SerialGate {
    /// A gate shared by nobody else.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide gate.
    pub fn global() -> Self {
        GLOBAL_GATE.clone()
    }

    /// Whether both handles serialize on the same lock.
    pub fn is_shared_with(&self, other: &SerialGate) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Issues GETs through a transport, one at a time per gate.
#[derive(Debug, Clone)]
pub struct Executor<T> {
    transport: T,
    gate: SerialGate,
}

impl<T: Transport> Executor<T> {
    pub fn new(transport: T, gate: SerialGate) -> Self {
        Self { transport, gate }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn gate(&self) -> &SerialGate {
        &self.gate
    }

    /// GET `url` and return the body if the marketplace reported success.
    pub fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = {
            let _guard = self.gate.acquire();
            self.transport.get(url)
        };

        let body = match response {
            Ok(response) if response.status == STATUS_GATEWAY_TIMEOUT => {
                warn!("upstream gateway timeout");
                return Err(ApiError::Timeout);
            }
            Ok(response) => response.body,
            Err(TransportError::Request(msg)) => return Err(ApiError::Transport(msg)),
            Err(TransportError::Body { status, .. }) if status == STATUS_GATEWAY_TIMEOUT => {
                warn!("upstream gateway timeout");
                return Err(ApiError::Timeout);
            }
            Err(TransportError::Body { message, .. }) => return Err(ApiError::BodyRead(message)),
        };

        let envelope = Envelope::decode(&body);
        if !envelope.is_success() {
            let message = envelope.message();
            warn!(error = %message, "marketplace reported an error");
            return Err(ApiError::Envelope(message));
        }

        debug!(bytes = body.len(), "response accepted");
        Ok(body)
    }
}

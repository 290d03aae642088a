//! Error types for the marketplace client.
//!
//! # Design
//! `Timeout` and `MinAmount` carry fixed display strings that callers use as
//! error identity. Envelope and purchase failures display the upstream text
//! verbatim; callers must treat it as opaque. Transport failures are not
//! classified further.

use thiserror::Error;

use crate::product::ProductLine;

/// Display text of [`ApiError::Timeout`].
pub const ERR_TIMEOUT: &str = "timeout";

/// Display text of [`ApiError::MinAmount`].
pub const ERR_MIN_AMOUNT: &str = "amount must be at least 100";

/// Errors returned by `MarketClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The upstream answered with 504 Gateway Timeout.
    #[error("timeout")]
    Timeout,

    /// A price below the minimum unit amount was rejected before any request.
    #[error("amount must be at least 100")]
    MinAmount,

    /// DNS, connection or other I/O failure while issuing the request.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("{0}")]
    BodyRead(String),

    /// The marketplace reported an `error` field in the response envelope.
    #[error("{0}")]
    Envelope(String),

    /// A purchase came back without an item id.
    #[error("{0}")]
    Purchase(String),

    /// A price feed row did not have the column count of its product line.
    #[error("malformed {product} row: expected {expected} columns, found {found}")]
    MalformedRow {
        product: ProductLine,
        expected: usize,
        found: usize,
    },

    /// The price feed could not be tokenised.
    #[error("price feed: {0}")]
    Feed(String),

    /// The response body did not match the operation's result type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    pub fn is_min_amount(&self) -> bool {
        matches!(self, ApiError::MinAmount)
    }
}

//! Blocking client for the market.dota2.net family of marketplace APIs.
//!
//! # Overview
//! Four marketplaces (Dota 2, CS:GO, TF2 and a gift market) share one HTTP
//! protocol: every operation is a GET whose URL carries the access key, and
//! whose JSON body may carry a generic `{error, result}` envelope. The bulk
//! price database is a semicolon-delimited text feed with a per-marketplace
//! column layout.
//!
//! # Design
//! - `MarketClient` is immutable once built and only exists after a
//!   successful `Test` probe.
//! - All requests pass through an `Executor` holding a `SerialGate`, so at
//!   most one request per gate is in flight. The default gate is process-wide.
//! - I/O sits behind the `Transport` trait; `UreqTransport` is the default.
//! - `ProductLine` is a closed enum, so every price feed row maps onto a
//!   known layout.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod http;
pub mod product;
pub mod record;
pub mod types;

pub use client::{MarketClient, MIN_PRICE};
pub use config::{ClientConfig, Language};
pub use endpoint::{Endpoint, RequestDirection};
pub use envelope::{Envelope, EnvelopeValue};
pub use error::{ApiError, ERR_MIN_AMOUNT, ERR_TIMEOUT};
pub use executor::{Executor, SerialGate};
pub use http::{HttpResponse, Transport, TransportError, UreqTransport};
pub use product::ProductLine;
pub use record::{map_row, parse_price_feed, PriceRecord, RecordDetails};

//! `retry-http` is composable retry and JSON middleware for reqwest clients.
//!
//! Every layer implements the same [`Transport`] round-trip contract, so
//! decorators chain freely:
//!
//! ```no_run
//! use retry_http::{
//!     ExponentialBackoffBuilder, HttpTransport, Request, RetryServerErrors, RetryTransport,
//!     Transport,
//! };
//!
//! # async fn run() -> retry_http::Result<()> {
//! let transport = RetryTransport::new(HttpTransport::new())
//!     .with_backoff(
//!         ExponentialBackoffBuilder::new()
//!             .with_max_elapsed_time(Some(std::time::Duration::from_secs(10)))
//!             .build(),
//!     )
//!     .with_predicate(RetryServerErrors);
//!
//! let req = Request::new(reqwest::Method::GET, "https://example.com/api/items")?;
//! let res = transport.round_trip(&req).await?;
//! # let _ = res;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod error;
mod json;
mod request;
mod retry;
mod transport;

pub use crate::backoff::BackoffPolicy;
pub use error::Error;
pub use json::{JsonSink, JsonTransport};
pub use request::Request;
pub use retry::{
    DefaultPredicate, RetryDecision, RetryPredicate, RetryServerErrors, RetryTransport,
};
pub use transport::{HttpTransport, Transport};

pub use ::backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, Error>;

use async_trait::async_trait;

use crate::{Error, Request, Result};

/// The round-trip capability: send one request, receive one
/// response-or-error.
///
/// Every middleware layer in this crate implements `Transport` and wraps
/// another `Transport`, so layers chain in any order. Implementations must
/// not consume the request; they clone whatever per-attempt state they need
/// via [`Request::try_replay`] and leave the original (in particular its
/// cancellation token) intact for outer layers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single logical round trip.
    async fn round_trip(&self, req: &Request) -> Result<reqwest::Response>;
}

/// Base transport executing requests on a `reqwest::Client`.
///
/// Connection pooling and TLS live inside the client; this type only maps
/// the request/response shapes onto the [`Transport`] contract.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport over a fresh `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over a pre-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, req: &Request) -> Result<reqwest::Response> {
        let attempt = req.try_replay()?;
        self.client.execute(attempt).await.map_err(Error::Transport)
    }
}

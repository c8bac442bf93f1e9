use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// An HTTP request plus its request-scoped cancellation token.
///
/// The underlying `reqwest::Request` is immutable across retries; decorators
/// obtain a per-attempt copy via [`Request::try_replay`]. The token is read
/// from this original request only, so cancelling it stops all pending
/// retries regardless of how many layers have wrapped the transport.
#[derive(Debug)]
pub struct Request {
    inner: reqwest::Request,
    cancel: CancellationToken,
}

impl Request {
    /// Creates a request for the given method and target URL.
    pub fn new(method: reqwest::Method, url: &str) -> Result<Self> {
        let url = url
            .parse::<reqwest::Url>()
            .map_err(|err| Error::Request(err.to_string()))?;
        Ok(Self::from(reqwest::Request::new(method, url)))
    }

    /// Sets the body to the JSON encoding of `value` and the `Content-Type`
    /// header to `application/json`.
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let payload = serde_json::to_vec(value).map_err(|err| Error::Encode(err.to_string()))?;
        self.inner
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *self.inner.body_mut() = Some(payload.into());
        Ok(self)
    }

    /// Merges the URL-encoded form of `value` into the query string.
    ///
    /// Pre-existing query values are retained; new pairs are appended.
    pub fn query<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let encoded =
            serde_urlencoded::to_string(value).map_err(|err| Error::Encode(err.to_string()))?;
        if !encoded.is_empty() {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&encoded)
                .map_err(|err| Error::Encode(err.to_string()))?;
            self.inner.url_mut().query_pairs_mut().extend_pairs(pairs);
        }
        Ok(self)
    }

    /// Attaches a cancellation token observed by retrying decorators.
    ///
    /// Without one, a request gets a token that never fires.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The request method.
    pub fn method(&self) -> &reqwest::Method {
        self.inner.method()
    }

    /// The target URL, including any merged query values.
    pub fn url(&self) -> &reqwest::Url {
        self.inner.url()
    }

    /// The request headers.
    pub fn headers(&self) -> &reqwest::header::HeaderMap {
        self.inner.headers()
    }

    /// The attached cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Resolves once the attached token is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Clones the underlying request for one attempt.
    ///
    /// Fails with [`Error::Replay`] when the body is a stream that cannot be
    /// re-read; supplying a replayable body is the caller's responsibility.
    pub fn try_replay(&self) -> Result<reqwest::Request> {
        self.inner.try_clone().ok_or(Error::Replay)
    }
}

impl From<reqwest::Request> for Request {
    fn from(inner: reqwest::Request) -> Self {
        Self {
            inner,
            cancel: CancellationToken::new(),
        }
    }
}

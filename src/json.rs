use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::{Error, Request, Result, Transport};

/// Destination slot a [`JsonTransport`] decodes response bodies into.
///
/// Cloning the sink shares the slot, so the caller keeps one handle and
/// hands the other to the transport.
#[derive(Debug)]
pub struct JsonSink<D> {
    slot: Arc<Mutex<Option<D>>>,
}

impl<D> JsonSink<D> {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Takes the most recently decoded value, leaving the slot empty.
    pub fn take(&self) -> Option<D> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn fill(&self, value: D) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }
}

impl<D> Clone for JsonSink<D> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<D> Default for JsonSink<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-decoding decorator around any [`Transport`].
///
/// Only parses the response: when the declared content type is
/// `application/json`, the body is buffered, decoded into the sink, and the
/// response is forwarded with its body intact. Any other content type
/// passes through untouched. Layer it above or below a
/// [`RetryTransport`](crate::RetryTransport); retry decisions happen at the
/// transport layer, before decoding.
#[derive(Clone, Debug)]
pub struct JsonTransport<T, D> {
    inner: T,
    sink: JsonSink<D>,
}

impl<T, D> JsonTransport<T, D> {
    /// Wraps `inner`, decoding JSON responses into `sink`.
    pub fn new(inner: T, sink: JsonSink<D>) -> Self {
        Self { inner, sink }
    }
}

fn declares_json(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|media| media.type_() == mime::APPLICATION && media.subtype() == mime::JSON)
}

#[async_trait]
impl<T, D> Transport for JsonTransport<T, D>
where
    T: Transport,
    D: DeserializeOwned + Send,
{
    async fn round_trip(&self, req: &Request) -> Result<reqwest::Response> {
        let res = self.inner.round_trip(req).await?;
        if !declares_json(res.headers()) {
            return Ok(res);
        }

        let status = res.status();
        let version = res.version();
        let headers = res.headers().clone();
        let bytes = res.bytes().await.map_err(Error::Transport)?;

        let decoded =
            serde_json::from_slice(&bytes).map_err(|err| Error::Decode(err.to_string()))?;
        self.sink.fill(decoded);

        let mut rebuilt = http::Response::new(reqwest::Body::from(bytes));
        *rebuilt.status_mut() = status;
        *rebuilt.version_mut() = version;
        *rebuilt.headers_mut() = headers;
        Ok(reqwest::Response::from(rebuilt))
    }
}

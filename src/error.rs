/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The request's cancellation token fired while a retry delay was
    /// pending. Always terminal; overrides any pending retry decision.
    #[error("request cancelled while waiting to retry")]
    Cancelled,
    /// Non-success HTTP status, as classified by a retry predicate.
    #[error("http error {status}")]
    Status { status: u16 },
    /// The request body could not be cloned for another attempt.
    #[error("request body cannot be replayed")]
    Replay,
    /// Body or query serialization error while building a request.
    #[error("encode error: {0}")]
    Encode(String),
    /// Response body could not be parsed as its declared content type.
    #[error("decode error: {0}")]
    Decode(String),
    /// Malformed method or URL at request construction.
    #[error("invalid request: {0}")]
    Request(String),
}

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::{BackoffPolicy, Error, ExponentialBackoff, Request, Result, Transport};

/// Outcome of evaluating one attempt.
#[derive(Debug)]
pub struct RetryDecision {
    /// Error to report when the loop stops on this attempt. `None` forwards
    /// the attempt's own outcome untouched.
    pub error: Option<Error>,
    /// Whether another attempt should be made.
    pub retry: bool,
}

/// Decides, once per attempt, whether to retry and what error to report.
///
/// Called after every attempt with the attempt's outcome and whether the
/// backoff budget is exhausted (`last_attempt`). The predicate may classify
/// or replace the error via [`RetryDecision::error`], but must not mutate
/// the request or response.
///
/// Termination is driven solely by the decision: a predicate that keeps
/// requesting retry once the backoff has stopped will loop with zero delay.
pub trait RetryPredicate: Send + Sync {
    /// Evaluates one attempt.
    fn evaluate(&self, outcome: &Result<reqwest::Response>, last_attempt: bool) -> RetryDecision;
}

impl<F> RetryPredicate for F
where
    F: Fn(&Result<reqwest::Response>, bool) -> RetryDecision + Send + Sync,
{
    fn evaluate(&self, outcome: &Result<reqwest::Response>, last_attempt: bool) -> RetryDecision {
        self(outcome, last_attempt)
    }
}

/// Default predicate: retry only failed attempts, never responses.
///
/// An HTTP error status with no transport failure is returned to the caller
/// as-is; use [`RetryServerErrors`] or a custom predicate to opt into
/// status-aware retries.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPredicate;

impl RetryPredicate for DefaultPredicate {
    fn evaluate(&self, outcome: &Result<reqwest::Response>, last_attempt: bool) -> RetryDecision {
        RetryDecision {
            error: None,
            retry: outcome.is_err() && !last_attempt,
        }
    }
}

/// Predicate that also retries responses with a retryable status code
/// (429 and the transient 5xx family), in addition to failed attempts.
#[derive(Clone, Copy, Debug, Default)]
pub struct RetryServerErrors;

fn retryable_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

impl RetryPredicate for RetryServerErrors {
    fn evaluate(&self, outcome: &Result<reqwest::Response>, last_attempt: bool) -> RetryDecision {
        let wants_retry = match outcome {
            Ok(res) => retryable_status(res.status()),
            Err(_) => true,
        };
        RetryDecision {
            error: None,
            retry: wants_retry && !last_attempt,
        }
    }
}

/// Retrying decorator around any [`Transport`].
///
/// Implements [`Transport`] itself, so it can wrap and be wrapped by other
/// layers. Each `round_trip` call takes a fresh copy of the configured
/// backoff policy, runs attempts strictly in sequence, and between attempts
/// sleeps for the scheduled delay unless the request's cancellation token
/// fires first.
#[derive(Clone, Debug)]
pub struct RetryTransport<T, B = ExponentialBackoff, P = DefaultPredicate> {
    inner: T,
    backoff: B,
    predicate: P,
}

impl<T> RetryTransport<T> {
    /// Wraps `inner` with the default exponential backoff and the default
    /// predicate.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            backoff: ExponentialBackoff::default(),
            predicate: DefaultPredicate,
        }
    }
}

impl<T, B, P> RetryTransport<T, B, P> {
    /// Replaces the backoff policy.
    pub fn with_backoff<B2: BackoffPolicy>(self, backoff: B2) -> RetryTransport<T, B2, P> {
        RetryTransport {
            inner: self.inner,
            backoff,
            predicate: self.predicate,
        }
    }

    /// Replaces the retry predicate.
    pub fn with_predicate<P2: RetryPredicate>(self, predicate: P2) -> RetryTransport<T, B, P2> {
        RetryTransport {
            inner: self.inner,
            backoff: self.backoff,
            predicate,
        }
    }
}

#[async_trait]
impl<T, B, P> Transport for RetryTransport<T, B, P>
where
    T: Transport,
    B: BackoffPolicy + Sync,
    P: RetryPredicate,
{
    async fn round_trip(&self, req: &Request) -> Result<reqwest::Response> {
        let mut schedule = self.backoff.fresh();

        loop {
            let outcome = self.inner.round_trip(req).await;
            let delay = schedule.next_interval();
            let last_attempt = delay.is_none();

            let decision = self.predicate.evaluate(&outcome, last_attempt);
            if !decision.retry {
                return match decision.error {
                    Some(error) => Err(error),
                    None => outcome,
                };
            }

            // An exhausted schedule yields no delay; a predicate that still
            // asks to retry at that point spins immediately.
            let delay = delay.unwrap_or(Duration::ZERO);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "retrying request");

            tokio::select! {
                () = sleep(delay) => {}
                () = req.cancelled() => return Err(Error::Cancelled),
            }
        }
    }
}

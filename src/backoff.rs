use std::time::Duration;

use backoff::backoff::Backoff;

/// A schedule of retry delays with a terminal exhaustion signal.
///
/// A policy value holds configuration plus the mutable state of one run.
/// [`RetryTransport`](crate::RetryTransport) never steps the configured
/// policy itself; it takes a [`fresh`](BackoffPolicy::fresh) copy at the
/// start of every call, so concurrent calls cannot corrupt each other's
/// schedules.
pub trait BackoffPolicy: Send {
    /// An independent copy with the same configuration, ready to start a
    /// new run (attempt counters and elapsed-time budget reset).
    fn fresh(&self) -> Self
    where
        Self: Sized;

    /// The delay to wait before the next attempt, or `None` once the
    /// attempt/time budget is exhausted.
    fn next_interval(&mut self) -> Option<Duration>;
}

impl BackoffPolicy for backoff::ExponentialBackoff {
    fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    fn next_interval(&mut self) -> Option<Duration> {
        self.next_backoff()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use backoff::ExponentialBackoffBuilder;

    use super::BackoffPolicy;

    fn deterministic(initial_ms: u64, max_elapsed: Option<Duration>) -> backoff::ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(initial_ms))
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(max_elapsed)
            .build()
    }

    #[test]
    fn fresh_restarts_the_schedule() {
        let mut policy = deterministic(100, None);
        assert_eq!(policy.next_interval(), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_interval(), Some(Duration::from_millis(200)));

        let mut restarted = policy.fresh();
        assert_eq!(restarted.next_interval(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn elapsed_budget_exhausts_to_none() {
        let mut policy = deterministic(1, Some(Duration::from_millis(5))).fresh();
        assert!(policy.next_interval().is_some());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(policy.next_interval(), None);
    }
}

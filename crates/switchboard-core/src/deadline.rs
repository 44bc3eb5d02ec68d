//! # Deadline Racer
//!
//! Runs an asynchronous operation against a timer and returns whichever
//! finishes first. When the timer wins the supplied cancellation token is
//! signalled and the operation future is dropped, so the caller gets an
//! answer at the deadline without waiting for the operation to stop.
//!
//! Dropping a future only stops work that is still polled by it. Work that
//! was moved onto its own task, or is blocked in a native call, keeps running
//! in the background until it observes the token or finishes.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Raised when an operation does not finish before its deadline.
///
/// `seconds` is the deadline truncated to whole seconds, so a 100 ms deadline
/// reports `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {seconds} seconds exceeded")]
pub struct DeadlineExceeded {
    pub seconds: u64,
}

impl DeadlineExceeded {
    pub fn from_duration(deadline: Duration) -> Self {
        Self {
            seconds: deadline.as_secs(),
        }
    }
}

/// Race `operation` against `deadline`.
///
/// Errors produced by the operation are returned untouched. A timeout is
/// reported through `E: From<DeadlineExceeded>` so callers can classify it
/// alongside their own failures.
pub async fn race<F, T, E>(
    deadline: Duration,
    cancel: &CancellationToken,
    operation: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineExceeded>,
{
    tokio::select! {
        biased;
        result = operation => result,
        () = tokio::time::sleep(deadline) => {
            cancel.cancel();
            tracing::debug!(
                deadline_ms = deadline.as_millis() as u64,
                "Deadline elapsed, cancellation signalled"
            );
            Err(DeadlineExceeded::from_duration(deadline).into())
        }
    }
}

/// Reusable racer bound to a fixed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineRacer {
    deadline: Duration,
}

impl DeadlineRacer {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Race `operation` with a private cancellation token.
    pub async fn run<F, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DeadlineExceeded>,
    {
        race(self.deadline, &CancellationToken::new(), operation).await
    }

    /// Race `operation`, signalling `cancel` if the deadline wins.
    pub async fn run_with_cancel<F, T, E>(
        &self,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DeadlineExceeded>,
    {
        race(self.deadline, cancel, operation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Timeout(u64),
        Boom(&'static str),
    }

    impl From<DeadlineExceeded> for TestError {
        fn from(err: DeadlineExceeded) -> Self {
            TestError::Timeout(err.seconds)
        }
    }

    #[tokio::test]
    async fn fast_operation_wins() {
        let racer = DeadlineRacer::new(Duration::from_secs(1));
        let result: Result<u32, TestError> = racer.run(async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn operation_errors_pass_through_unchanged() {
        let racer = DeadlineRacer::new(Duration::from_secs(1));
        let result: Result<u32, TestError> = racer.run(async { Err(TestError::Boom("x")) }).await;
        assert_eq!(result, Err(TestError::Boom("x")));
    }

    #[tokio::test]
    async fn slow_operation_times_out_promptly() {
        let cancel = CancellationToken::new();
        let started = Instant::now();

        let result: Result<(), TestError> = race(Duration::from_millis(100), &cancel, async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await;

        assert_eq!(result, Err(TestError::Timeout(0)));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn token_untouched_when_operation_wins() {
        let cancel = CancellationToken::new();
        let _: Result<(), TestError> =
            race(Duration::from_secs(1), &cancel, async { Ok(()) }).await;
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn seconds_are_truncated() {
        assert_eq!(DeadlineExceeded::from_duration(Duration::from_millis(999)).seconds, 0);
        assert_eq!(DeadlineExceeded::from_duration(Duration::from_millis(2500)).seconds, 2);
        assert_eq!(DeadlineExceeded::from_duration(Duration::from_secs(30)).seconds, 30);
    }
}

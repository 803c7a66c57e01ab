//! Backoff Retry for Rate-Limited Calls
//!
//! Wraps a single fallible async operation with bounded exponential backoff
//! restricted to the rate-limiting signal. The wait is decomposed into
//! one-second ticks so a caller can render a live countdown; any other
//! failure propagates immediately.

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::constants::retry as retry_constants;
use crate::types::{DocsmithError, Result};

/// Retry tuning for one call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the delay between attempts
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry_constants::MAX_RETRIES,
            initial_delay: Duration::from_millis(retry_constants::INITIAL_DELAY_MS),
            backoff_factor: retry_constants::BACKOFF_FACTOR,
        }
    }
}

/// Countdown observation delivered to the caller once per second while
/// waiting, plus a terminal `Idle` before `call_with_retry` returns on
/// every path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTick {
    Waiting { seconds_remaining: u64 },
    Idle,
}

/// Attempt `op`, retrying only on the rate-limited signal.
///
/// On a rate-limited failure with retries left, waits the current delay
/// (ticking `on_tick` once per remaining second), multiplies the delay by
/// the backoff factor and tries again. Exhausting the budget yields
/// [`DocsmithError::RetriesExhausted`]; the operation is attempted exactly
/// `max_retries + 1` times in that case. The wait is a timed suspension,
/// never a thread block.
pub async fn call_with_retry<T, F, Fut, O>(
    policy: RetryPolicy,
    mut op: F,
    mut on_tick: O,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    O: FnMut(RetryTick),
{
    let mut attempt: u32 = 0;
    let mut delay = policy.initial_delay;

    loop {
        match op().await {
            Ok(value) => {
                on_tick(RetryTick::Idle);
                return Ok(value);
            }
            Err(err) if err.is_rate_limited() => {
                if attempt >= policy.max_retries {
                    on_tick(RetryTick::Idle);
                    return Err(DocsmithError::RetriesExhausted {
                        attempts: attempt + 1,
                        message: err.to_string(),
                    });
                }
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off before retry"
                );
                countdown(delay, &mut on_tick).await;
                delay = delay.mul_f64(policy.backoff_factor);
                attempt += 1;
            }
            Err(err) => {
                on_tick(RetryTick::Idle);
                return Err(err);
            }
        }
    }
}

/// Wait out `delay` in whole-second ticks, reporting the seconds remaining
/// before each one. A sub-second remainder is slept without a tick.
async fn countdown<O: FnMut(RetryTick)>(delay: Duration, on_tick: &mut O) {
    let mut remaining = delay.as_secs();
    let subsec = delay - Duration::from_secs(remaining);

    while remaining > 0 {
        on_tick(RetryTick::Waiting {
            seconds_remaining: remaining,
        });
        sleep(Duration::from_secs(1)).await;
        remaining -= 1;
    }
    if !subsec.is_zero() {
        sleep(subsec).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
        }
    }

    fn rate_limited() -> DocsmithError {
        DocsmithError::from_http_status(429, "Too Many Requests")
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_rate_limited_failures() {
        let calls = Cell::new(0u32);
        let ticks = RefCell::new(Vec::new());

        let result = call_with_retry(
            fast_policy(5),
            || {
                let n = calls.get();
                calls.set(n + 1);
                async move {
                    if n < 2 {
                        Err(rate_limited())
                    } else {
                        Ok("done")
                    }
                }
            },
            |tick| ticks.borrow_mut().push(tick),
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
        let ticks = ticks.into_inner();
        // First wait counts down from 2, second from 4 (doubled delay).
        assert_eq!(
            ticks,
            vec![
                RetryTick::Waiting { seconds_remaining: 2 },
                RetryTick::Waiting { seconds_remaining: 1 },
                RetryTick::Waiting { seconds_remaining: 4 },
                RetryTick::Waiting { seconds_remaining: 3 },
                RetryTick::Waiting { seconds_remaining: 2 },
                RetryTick::Waiting { seconds_remaining: 1 },
                RetryTick::Idle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retries_with_attempt_count() {
        let calls = Cell::new(0u32);
        let ticks = RefCell::new(Vec::new());

        let result: Result<()> = call_with_retry(
            fast_policy(3),
            || {
                calls.set(calls.get() + 1);
                async { Err(rate_limited()) }
            },
            |tick| ticks.borrow_mut().push(tick),
        )
        .await;

        // Initial attempt plus max_retries retries.
        assert_eq!(calls.get(), 4);
        match result.unwrap_err() {
            DocsmithError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 4),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*ticks.borrow().last().unwrap(), RetryTick::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_failures_propagate_without_retry() {
        let calls = Cell::new(0u32);
        let ticks = RefCell::new(Vec::new());

        let result: Result<()> = call_with_retry(
            fast_policy(5),
            || {
                calls.set(calls.get() + 1);
                async { Err(DocsmithError::from_http_status(500, "server error")) }
            },
            |tick| ticks.borrow_mut().push(tick),
        )
        .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(
            result.unwrap_err(),
            DocsmithError::Api { status: 500, .. }
        ));
        assert_eq!(ticks.into_inner(), vec![RetryTick::Idle]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_still_reports_idle() {
        let ticks = RefCell::new(Vec::new());

        let result = call_with_retry(
            fast_policy(5),
            || async { Ok(1) },
            |tick| ticks.borrow_mut().push(tick),
        )
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(ticks.into_inner(), vec![RetryTick::Idle]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_fails_on_first_rate_limit() {
        let calls = Cell::new(0u32);

        let result: Result<()> = call_with_retry(
            fast_policy(0),
            || {
                calls.set(calls.get() + 1);
                async { Err(rate_limited()) }
            },
            |_| {},
        )
        .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(
            result.unwrap_err(),
            DocsmithError::RetriesExhausted { attempts: 1, .. }
        ));
    }
}

//! Bounded exponential backoff for transient store errors.
//!
//! Only [`DbError::is_transient`] errors (lock contention) are retried.
//! Everything else, and a transient error that outlives the attempt budget,
//! is returned to the caller.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DbError;
use crate::statement::{Row, Statement};
use crate::store::AnalyticalStore;

/// Default delay before the first retry.
const DEFAULT_BASE_DELAY_MS: u64 = 100;

/// Default upper bound on a single delay.
const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

/// Default total attempts, including the first.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Retry budget and backoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Doubles from `base_delay` and saturates at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let factor = 1_u32.checked_shl(shift).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Store wrapper that retries transient failures.
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: AnalyticalStore> RetryingStore<S> {
    /// Wrap `inner` with the given policy.
    pub const fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// The retry policy in force.
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<S: AnalyticalStore> AnalyticalStore for RetryingStore<S> {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, DbError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt: u32 = 1;
        loop {
            match self.inner.execute(statement.clone()).await {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        table = statement.table(),
                        statement = statement.kind(),
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Transient store error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) if err.is_transient() => {
                    tracing::error!(
                        table = statement.table(),
                        attempts = attempt,
                        error = %err,
                        "Store retry budget exhausted"
                    );
                    return Err(DbError::RetriesExhausted {
                        attempts: attempt,
                        table: statement.table().to_owned(),
                        last_error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

//! Bounded retry/poll loops that mask the vector index's eventual consistency.
//!
//! Two loops live here:
//! - [`await_count`]: after a write, poll the index until its vector count reaches
//!   the expected value. Running out of attempts is not an error.
//! - [`retry_search`]: re-issue a search that came back empty, and tolerate
//!   failed attempts until the last one.
//!
//! Both are driven by a [`RetryBudget`]. Attempts run strictly one after another,
//! waits are `tokio::time::sleep` (the calling task yields), and nothing is spawned:
//! dropping the caller's future stops the loop at its next await point.

use super::types::ConsistencyOptions;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_WRITE_MAX_RETRIES: u32 = 5;
pub const DEFAULT_WRITE_RETRY_DELAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_SEARCH_MAX_RETRIES: u32 = 1;
pub const DEFAULT_SEARCH_RETRY_DELAY: Duration = Duration::ZERO;

/// Wait after creating an index before returning, so that immediately following
/// operations see it.
pub const INDEX_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Attempt counter for one operation: how many attempts are allowed, how many were
/// made, and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryBudget {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Exactly one attempt, no waiting.
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Budget for post-write polling.
    pub fn for_writes(consistency: &ConsistencyOptions) -> Self {
        Self::new(
            consistency.max_retries.unwrap_or(DEFAULT_WRITE_MAX_RETRIES),
            consistency.retry_delay.unwrap_or(DEFAULT_WRITE_RETRY_DELAY),
        )
    }

    /// Budget for searches. Without enabled consistency a search gets one attempt.
    pub fn for_search(consistency: Option<&ConsistencyOptions>) -> Self {
        match consistency {
            Some(c) if c.enabled => Self::new(
                c.max_retries.unwrap_or(DEFAULT_SEARCH_MAX_RETRIES),
                c.retry_delay.unwrap_or(DEFAULT_SEARCH_RETRY_DELAY),
            ),
            _ => Self::single(),
        }
    }

    /// Start the next attempt. Returns `false` once the budget is spent.
    pub fn begin_attempt(&mut self) -> bool {
        if self.attempt >= self.max_attempts {
            return false;
        }
        self.attempt += 1;
        true
    }

    /// 1-based number of the current attempt (0 before the first).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn remaining(&self) -> u32 {
        self.max_attempts - self.attempt
    }

    pub fn is_last(&self) -> bool {
        self.remaining() == 0
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cooperative wait between attempts. A zero delay does not touch the timer.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// How a post-write poll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The observed count reached the expected value.
    Converged { attempts: u32 },
    /// The budget ran out first. `last_observed` is `None` when the index was not visible.
    Exhausted {
        attempts: u32,
        last_observed: Option<u64>,
    },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Poll `observe` until it reports `expected`, sleeping between attempts.
///
/// `observe` yields the current vector count, or `None` when the index is not
/// visible yet. Its errors propagate.
pub async fn await_count<F, Fut>(
    mut budget: RetryBudget,
    expected: u64,
    mut observe: F,
) -> Result<Convergence>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<u64>>>,
{
    let mut last_observed = None;
    while budget.begin_attempt() {
        last_observed = observe().await?;
        if last_observed == Some(expected) {
            debug!(
                attempt = budget.attempt(),
                expected, "vector count converged"
            );
            return Ok(Convergence::Converged {
                attempts: budget.attempt(),
            });
        }
        debug!(
            attempt = budget.attempt(),
            max_attempts = budget.max_attempts(),
            expected,
            observed = ?last_observed,
            "vector count not converged yet"
        );
        if !budget.is_last() {
            budget.pause().await;
        }
    }

    Ok(Convergence::Exhausted {
        attempts: budget.attempt(),
        last_observed,
    })
}

/// Run `search` until it returns matches or the budget is spent.
///
/// - matches: returned immediately
/// - empty and `retry_on_empty` is false: returned immediately
/// - empty otherwise: wait and retry; empty after the last attempt
/// - error: wait and retry; the last attempt's error is returned
pub async fn retry_search<T, F, Fut>(
    mut budget: RetryBudget,
    retry_on_empty: bool,
    mut search: F,
) -> Result<Vec<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut last_error: Option<Error> = None;
    while budget.begin_attempt() {
        match search().await {
            Ok(matches) if !matches.is_empty() => return Ok(matches),
            Ok(matches) if !retry_on_empty => return Ok(matches),
            Ok(_) => {
                if budget.is_last() {
                    break;
                }
                warn!(
                    attempt = budget.attempt(),
                    max_attempts = budget.max_attempts(),
                    "search returned no results, retrying"
                );
            }
            Err(e) => {
                if budget.is_last() {
                    return Err(e);
                }
                warn!(
                    attempt = budget.attempt(),
                    max_attempts = budget.max_attempts(),
                    error = %e,
                    "search attempt failed, retrying"
                );
                last_error = Some(e);
            }
        }
        budget.pause().await;
    }

    if let Some(e) = last_error {
        debug!(error = %e, "search budget exhausted without matches");
    }
    Ok(Vec::new())
}

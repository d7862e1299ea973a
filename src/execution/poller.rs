//! Waits for a submitted statement to reach a terminal status.
//!
//! The schedule decides what happens after each status lookup; the poller
//! performs the lookups and sleeps. Sleeping goes through `tokio::time`, so
//! tests drive it with a paused clock.

use super::{ExecutionHandle, ExecutionStatus, StatementDescription, StatementService};
use crate::error::{DispatchError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Timing rules for status polling.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay after the first pending status.
    pub interval: Duration,
    /// Cap on the delay between lookups.
    pub max_interval: Duration,
    /// Growth factor applied after each pending status.
    pub backoff: f64,
    /// Total time allowed before giving up.
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(5),
            backoff: 1.5,
            max_wait: Duration::from_secs(840),
        }
    }
}

/// What to do after observing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Terminal status observed.
    Done,
    /// Still pending; look again after the given delay.
    Wait(Duration),
    /// Still pending and the wait budget is spent.
    TimedOut,
}

/// Capped exponential backoff bounded by a total wait.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    policy: PollPolicy,
    next_delay: Duration,
}

impl PollSchedule {
    pub fn new(policy: PollPolicy) -> Self {
        let next_delay = policy.interval.min(policy.max_interval);
        Self { policy, next_delay }
    }

    /// Decides the next step given the latest status and the time elapsed
    /// since submission.
    pub fn next(&mut self, status: ExecutionStatus, elapsed: Duration) -> PollStep {
        if status.is_terminal() {
            return PollStep::Done;
        }

        let Some(remaining) = self.policy.max_wait.checked_sub(elapsed) else {
            return PollStep::TimedOut;
        };
        if remaining.is_zero() {
            return PollStep::TimedOut;
        }

        let delay = self.next_delay.min(remaining);
        self.next_delay =
            Duration::try_from_secs_f64(self.next_delay.as_secs_f64() * self.policy.backoff)
                .unwrap_or(self.policy.max_interval)
                .min(self.policy.max_interval);
        PollStep::Wait(delay)
    }
}

/// Polls a statement until it reaches a terminal status.
pub struct Poller<'a> {
    service: &'a dyn StatementService,
    policy: &'a PollPolicy,
}

impl<'a> Poller<'a> {
    pub fn new(service: &'a dyn StatementService, policy: &'a PollPolicy) -> Self {
        Self { service, policy }
    }

    /// Blocks the current invocation until the statement is FINISHED, FAILED
    /// or ABORTED, returning the terminal description.
    ///
    /// Never returns a pending status. Fails with `PollTimeout` once the
    /// policy's wait budget is spent; the remote statement keeps running.
    pub async fn await_terminal(&self, handle: &ExecutionHandle) -> Result<StatementDescription> {
        let started = Instant::now();
        let mut schedule = PollSchedule::new(self.policy.clone());
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let description = self.service.describe(handle).await?;

            match schedule.next(description.status, started.elapsed()) {
                PollStep::Done => {
                    debug!(
                        execution_id = %handle,
                        status = %description.status,
                        attempt,
                        "statement reached terminal status"
                    );
                    return Ok(description);
                }
                PollStep::Wait(delay) => {
                    debug!(
                        execution_id = %handle,
                        status = %description.status,
                        attempt,
                        "statement pending, next check in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                PollStep::TimedOut => {
                    let waited = started.elapsed();
                    warn!(
                        execution_id = %handle,
                        status = %description.status,
                        "giving up after {:?}; statement continues remotely",
                        waited
                    );
                    return Err(DispatchError::PollTimeout {
                        execution_id: handle.execution_id.clone(),
                        waited,
                    });
                }
            }
        }
    }
}

//! Fixed-interval tick driver.
//!
//! The first tick runs immediately, later ticks follow the interval. Ticks
//! never overlap: a long tick just pushes the next one back, nothing is
//! queued or dropped.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::engine::{PollOutcome, TerminationReason, Watcher};
use crate::error::WatchError;
use crate::session::Authenticator;
use crate::source::SlotSource;

/// Work driven by the [`Scheduler`].
#[async_trait]
pub trait Tick: Send {
    async fn tick(&mut self) -> Result<PollOutcome, WatchError>;
}

#[async_trait]
impl<A, S> Tick for Watcher<A, S>
where
    A: Authenticator,
    S: SlotSource,
{
    async fn tick(&mut self) -> Result<PollOutcome, WatchError> {
        Watcher::tick(self).await
    }
}

pub struct Scheduler {
    interval: Duration,
    finished: Option<TerminationReason>,
    ticks: u64,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            finished: None,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a task has asked to terminate. Once set this never clears.
    pub fn is_stopped(&self) -> bool {
        self.finished.is_some()
    }

    fn stop(&mut self, reason: TerminationReason) {
        self.finished = Some(reason);
    }

    /// Drive `task` until it asks to terminate or fails fatally.
    ///
    /// Recoverable tick errors are logged and the next tick proceeds as
    /// scheduled. A stopped scheduler returns its termination reason again
    /// without ticking.
    pub async fn run<T>(&mut self, task: &mut T) -> Result<TerminationReason, WatchError>
    where
        T: Tick + ?Sized,
    {
        if let Some(reason) = self.finished {
            return Ok(reason);
        }

        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            self.ticks += 1;

            match task.tick().await {
                Ok(PollOutcome::Continue) => {}
                Ok(PollOutcome::Terminate(reason)) => {
                    info!(ticks = self.ticks, ?reason, "scheduler stopping");
                    self.stop(reason);
                    return Ok(reason);
                }
                Err(e) if !e.is_fatal() => {
                    warn!(tick = self.ticks, error = %e, "tick aborted");
                }
                Err(e) => {
                    error!(tick = self.ticks, error = %e, "fatal error, stopping");
                    return Err(e);
                }
            }
        }
    }
}

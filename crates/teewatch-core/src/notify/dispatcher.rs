//! Fire-and-forget delivery with loud failure.
//!
//! Sends run as tokio tasks so a slow mail provider never holds up a poll
//! tick. Each send owns its [`FoundSlot`] snapshot; nothing is shared with
//! the tick that produced it.

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use super::{FoundSlot, Notifier};
use crate::error::NotificationError;

pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    in_flight: JoinSet<Result<(), NotificationError>>,
    dispatched: usize,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            in_flight: JoinSet::new(),
            dispatched: 0,
        }
    }

    /// Start delivering `found` without waiting for it.
    pub fn dispatch(&mut self, found: FoundSlot) {
        let notifier = Arc::clone(&self.notifier);
        debug!(date = %found.date, time = %found.time, "dispatching notification");
        self.in_flight
            .spawn(async move { notifier.notify(&found).await });
        self.dispatched += 1;
    }

    /// Total notifications handed out so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Sends not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Reap finished sends without blocking and surface the first failure.
    pub fn check(&mut self) -> Result<(), NotificationError> {
        while let Some(joined) = self.in_flight.try_join_next() {
            joined?.inspect_err(|e| error!(error = %e, "notification failed"))?;
        }
        Ok(())
    }

    /// Wait for every in-flight send to settle.
    pub async fn drain(&mut self) -> Result<(), NotificationError> {
        while let Some(joined) = self.in_flight.join_next().await {
            joined?.inspect_err(|e| error!(error = %e, "notification failed"))?;
        }
        Ok(())
    }
}

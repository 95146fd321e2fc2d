//! Poll cycle and the watch state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Starting -> Authenticated -> Polling -> (Polling | Terminated)
//!                   ^             |
//!                   +-- stale ----+
//! ```
//!
//! `Terminated` is absorbing: once the watchlist is empty no further fetch
//! or notification happens.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FetchError, WatchError};
use crate::notify::{FoundSlot, NotificationDispatcher};
use crate::session::{Authenticator, SessionManager};
use crate::slot::is_suitable;
use crate::source::SlotSource;
use crate::watchlist::Watchlist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    /// No tick has run yet.
    Starting,
    /// A fresh session was obtained this tick and the poll has not completed.
    /// Left in place when the poll fails after logging in.
    Authenticated,
    /// The last tick completed with slots still being watched.
    Polling,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every watched slot has been found.
    WatchlistExhausted,
}

/// What the scheduler should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Continue,
    Terminate(TerminationReason),
}

/// Run one poll cycle over `watchlist`.
///
/// Narrowing is committed date by date. If a fetch fails, dates already
/// handled in this cycle stay narrowed and the remaining dates are left
/// untouched until the next cycle.
pub async fn poll_cycle<A, S>(
    session: &mut SessionManager<A>,
    watchlist: &mut Watchlist,
    source: &S,
    dispatcher: &mut NotificationDispatcher,
    spots_required: usize,
) -> Result<PollOutcome, WatchError>
where
    A: Authenticator,
    S: SlotSource + ?Sized,
{
    if watchlist.is_empty() {
        return Ok(PollOutcome::Terminate(TerminationReason::WatchlistExhausted));
    }

    let token = session.ensure_valid().await?.to_string();

    for entry in watchlist.entries() {
        info!(date = %entry.date, times = entry.times.len(), "checking date");

        let day = match source.fetch(&entry.date, &token).await {
            Ok(day) => day,
            Err(e) => {
                if matches!(e, FetchError::SessionRejected { .. }) {
                    session.invalidate();
                }
                return Err(e.into());
            }
        };

        let mut surviving = Vec::with_capacity(entry.times.len());
        for time in entry.times {
            let slot = match day.slot(&entry.date, &time) {
                Ok(slot) => slot,
                Err(e) => {
                    warn!(date = %entry.date, %time, error = %e, "skipping slot");
                    surviving.push(time);
                    continue;
                }
            };

            let suitable = is_suitable(&slot, spots_required);
            info!(
                date = %entry.date,
                %time,
                bookable = slot.bookable,
                participants = slot.participant_count(),
                open = slot.open_count(),
                suitable,
                "evaluated slot"
            );

            if suitable {
                info!(date = %entry.date, %time, "found a bookable tee time");
                dispatcher.dispatch(FoundSlot::new(entry.date.clone(), time, slot));
            } else {
                surviving.push(time);
            }
        }

        watchlist.narrow(&entry.date, &surviving);
    }

    if watchlist.is_empty() {
        Ok(PollOutcome::Terminate(TerminationReason::WatchlistExhausted))
    } else {
        Ok(PollOutcome::Continue)
    }
}

/// Owns everything a watch run mutates.
pub struct Watcher<A, S> {
    session: SessionManager<A>,
    source: S,
    watchlist: Watchlist,
    dispatcher: NotificationDispatcher,
    spots_required: usize,
    state: WatchState,
    ticks: u64,
}

impl<A: Authenticator, S: SlotSource> Watcher<A, S> {
    pub fn new(
        session: SessionManager<A>,
        source: S,
        watchlist: Watchlist,
        dispatcher: NotificationDispatcher,
        spots_required: usize,
    ) -> Self {
        Self {
            session,
            source,
            watchlist,
            dispatcher,
            spots_required,
            state: WatchState::Starting,
            ticks: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn session(&self) -> &SessionManager<A> {
        &self.session
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// One poll tick. A failed notification from an earlier tick is
    /// reported here before any new work starts.
    pub async fn tick(&mut self) -> Result<PollOutcome, WatchError> {
        if self.state == WatchState::Terminated {
            return Ok(PollOutcome::Terminate(TerminationReason::WatchlistExhausted));
        }

        self.dispatcher.check()?;
        self.ticks += 1;
        info!(tick = self.ticks, pairs = self.watchlist.pair_count(), "polling");

        let logins_before = self.session.login_count();
        self.session.ensure_valid().await?;
        if self.session.login_count() > logins_before {
            info!(tick = self.ticks, from = ?self.state, "session established");
            self.state = WatchState::Authenticated;
        }

        let outcome = poll_cycle(
            &mut self.session,
            &mut self.watchlist,
            &self.source,
            &mut self.dispatcher,
            self.spots_required,
        )
        .await?;
        self.state = match outcome {
            PollOutcome::Continue => WatchState::Polling,
            PollOutcome::Terminate(_) => {
                info!(tick = self.ticks, "watchlist is now empty");
                WatchState::Terminated
            }
        };
        Ok(outcome)
    }

    /// Wait for in-flight notifications before the process stops.
    pub async fn finish(&mut self) -> Result<(), WatchError> {
        self.dispatcher.drain().await?;
        Ok(())
    }
}

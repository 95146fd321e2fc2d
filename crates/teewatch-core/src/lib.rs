//! # teewatch Core Library
//!
//! Watches a club's online tee sheet for slots that open up, sends one
//! e-mail per slot the moment it becomes bookable, and stops once every
//! watched slot has been found.
//!
//! ## Architecture
//!
//! - **Session**: cookie-based login that is renewed when it gets stale
//! - **Watchlist**: the shrinking set of (date, time) pairs still watched
//! - **Slot**: tee-sheet schema and the suitability rule
//! - **Source / Notify**: HTTP collaborators for the tee sheet and Mailgun
//! - **Watch**: the poll cycle state machine and its fixed-interval scheduler
//!
//! ## Key Components
//!
//! - [`Watcher`]: owns session, watchlist and dispatcher; one `tick()` per poll
//! - [`Scheduler`]: first tick immediately, then one per interval
//! - [`SessionManager`]: keeps the session token fresh
//! - [`Watchlist`]: monotonic narrowing of watched slots

pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod slot;
pub mod source;
pub mod watch;
pub mod watchlist;

pub use config::{Config, WatchInput};
pub use error::{AuthError, ConfigError, EvaluationError, FetchError, NotificationError, WatchError};
pub use notify::{FoundSlot, MailgunNotifier, NotificationDispatcher, Notifier};
pub use session::{Authenticator, LoginClient, SessionManager};
pub use slot::{is_suitable, Participant, SlotInfo, TeeSheetDay};
pub use source::{SlotSource, TeeSheetClient};
pub use watch::{
    build_watcher, poll_cycle, run_to_completion, PollOutcome, Scheduler, TerminationReason,
    WatchState, Watcher,
};
pub use watchlist::{WatchEntry, Watchlist};

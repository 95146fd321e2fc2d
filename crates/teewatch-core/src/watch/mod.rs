//! Watch process: the poll cycle, its state machine and the tick driver.

pub mod engine;
pub mod scheduler;

pub use engine::{poll_cycle, PollOutcome, TerminationReason, WatchState, Watcher};
pub use scheduler::{Scheduler, Tick};

use std::sync::Arc;
use tracing::{error, info};

use crate::config::{Config, WatchInput};
use crate::error::WatchError;
use crate::notify::{MailgunNotifier, NotificationDispatcher};
use crate::session::{Authenticator, LoginClient, SessionManager};
use crate::source::{SlotSource, TeeSheetClient};

/// Drive `watcher` until the watchlist is exhausted or a fatal error occurs,
/// then wait for any notification still being delivered.
///
/// A delivery failure found while draining turns a clean finish into an
/// error. When the run already failed, the original error wins.
pub async fn run_to_completion<A, S>(
    scheduler: &mut Scheduler,
    watcher: &mut Watcher<A, S>,
) -> Result<TerminationReason, WatchError>
where
    A: Authenticator,
    S: SlotSource,
{
    let outcome = scheduler.run(watcher).await;
    let drained = watcher.finish().await;

    match (outcome, drained) {
        (Ok(reason), Ok(())) => {
            info!(
                ?reason,
                ticks = watcher.ticks(),
                notifications = watcher.dispatcher().dispatched(),
                "watch finished"
            );
            Ok(reason)
        }
        (Ok(_), Err(e)) => Err(e),
        (Err(e), drained) => {
            if let Err(drain_err) = drained {
                error!(error = %drain_err, "notification failed during shutdown");
            }
            Err(e)
        }
    }
}

/// Wire the live site, mail transport and watchlist into a [`Watcher`].
pub fn build_watcher(
    config: &Config,
    input: &WatchInput,
) -> Result<Watcher<LoginClient, TeeSheetClient>, WatchError> {
    let base_url = config.base_url()?;
    let login = LoginClient::new(&base_url, config.credentials.clone())?;
    let source = TeeSheetClient::new(base_url, config.resource_id.clone())?;
    let notifier = MailgunNotifier::new(config.mailgun.clone(), config.notification.clone());

    Ok(Watcher::new(
        SessionManager::new(login, config.login_validity()),
        source,
        input.watchlist(),
        NotificationDispatcher::new(Arc::new(notifier)),
        input.spots_required,
    ))
}

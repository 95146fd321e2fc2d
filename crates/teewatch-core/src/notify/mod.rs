//! Telling the user a slot opened up.
//!
//! Each suitable slot produces exactly one [`FoundSlot`]. Delivery runs in
//! the background through the [`NotificationDispatcher`]; any delivery
//! failure is fatal to the watch process.

mod dispatcher;
mod mailgun;
mod message;

pub use dispatcher::NotificationDispatcher;
pub use mailgun::MailgunNotifier;
pub use message::NotificationMessage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::NotificationError;
use crate::slot::SlotInfo;

/// A slot judged suitable for the first time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundSlot {
    pub date: String,
    pub time: String,
    pub slot: SlotInfo,
    pub found_at: DateTime<Utc>,
}

impl FoundSlot {
    pub fn new(date: impl Into<String>, time: impl Into<String>, slot: SlotInfo) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            slot,
            found_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, found: &FoundSlot) -> Result<(), NotificationError>;
}

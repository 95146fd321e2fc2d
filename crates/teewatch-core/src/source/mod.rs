//! Where tee-sheet data comes from.

mod tee_sheet;

pub use tee_sheet::TeeSheetClient;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::slot::TeeSheetDay;

/// Fetches one day of availability using an authenticated session.
#[async_trait]
pub trait SlotSource: Send + Sync {
    async fn fetch(&self, date: &str, session_token: &str) -> Result<TeeSheetDay, FetchError>;
}

#[async_trait]
impl<T: SlotSource + ?Sized> SlotSource for std::sync::Arc<T> {
    async fn fetch(&self, date: &str, session_token: &str) -> Result<TeeSheetDay, FetchError> {
        (**self).fetch(date, session_token).await
    }
}

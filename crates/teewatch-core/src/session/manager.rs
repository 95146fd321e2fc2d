//! Owner of the single authenticated session.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::login::Authenticator;
use crate::error::AuthError;

/// Token plus the moment it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub issued_at: DateTime<Utc>,
}

/// Current session, absent until the first successful login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<SessionToken>,
}

impl SessionState {
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Whether the token is missing or older than `validity` at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, validity: Duration) -> bool {
        match &self.token {
            None => true,
            Some(token) => now - token.issued_at >= validity,
        }
    }
}

pub struct SessionManager<A> {
    authenticator: A,
    validity: Duration,
    state: SessionState,
    logins: u32,
}

impl<A: Authenticator> SessionManager<A> {
    pub fn new(authenticator: A, validity: Duration) -> Self {
        Self {
            authenticator,
            validity,
            state: SessionState::default(),
            logins: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Number of successful logins so far.
    pub fn login_count(&self) -> u32 {
        self.logins
    }

    /// Current token value if one has been issued, stale or not.
    pub fn current_token(&self) -> Option<&str> {
        self.state.token.as_ref().map(|t| t.value.as_str())
    }

    /// Make sure a fresh token is held, logging in again if needed.
    pub async fn ensure_valid(&mut self) -> Result<&str, AuthError> {
        self.ensure_valid_at(Utc::now()).await
    }

    pub async fn ensure_valid_at(&mut self, now: DateTime<Utc>) -> Result<&str, AuthError> {
        if self.state.is_stale(now, self.validity) {
            self.authenticate_at(now).await?;
        }
        // A successful login always leaves a token behind.
        self.current_token().ok_or(AuthError::MissingSessionId)
    }

    /// Log in unconditionally. The old token is only replaced once the whole
    /// exchange has succeeded.
    pub async fn authenticate(&mut self) -> Result<(), AuthError> {
        self.authenticate_at(Utc::now()).await
    }

    async fn authenticate_at(&mut self, now: DateTime<Utc>) -> Result<(), AuthError> {
        let value = self.authenticator.authenticate().await?;
        self.state.token = Some(SessionToken {
            value,
            issued_at: now,
        });
        self.logins += 1;
        info!(login = self.logins, "session established");
        Ok(())
    }

    /// Drop the current token so the next `ensure_valid` logs in again.
    pub fn invalidate(&mut self) {
        if self.state.token.take().is_some() {
            info!("session invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingAuth {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl Authenticator for CountingAuth {
        async fn authenticate(&self) -> Result<String, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(AuthError::MissingSessionId);
            }
            Ok(format!("PHPSESSID=s{n}"))
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2022-10-14T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn first_use_logs_in() {
        let auth = CountingAuth::default();
        let mut manager = SessionManager::new(auth.clone(), Duration::minutes(20));

        let token = manager.ensure_valid_at(t0()).await.unwrap().to_string();
        assert_eq!(token, "PHPSESSID=s1");
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_is_reused_within_validity_window() {
        let auth = CountingAuth::default();
        let mut manager = SessionManager::new(auth.clone(), Duration::minutes(20));

        manager.ensure_valid_at(t0()).await.unwrap();
        manager
            .ensure_valid_at(t0() + Duration::minutes(19))
            .await
            .unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_token_is_refreshed() {
        let auth = CountingAuth::default();
        let mut manager = SessionManager::new(auth.clone(), Duration::minutes(20));

        manager.ensure_valid_at(t0()).await.unwrap();
        let later = t0() + Duration::minutes(20);
        let token = manager.ensure_valid_at(later).await.unwrap().to_string();

        assert_eq!(token, "PHPSESSID=s2");
        assert_eq!(manager.state().token().unwrap().issued_at, later);
        assert_eq!(manager.login_count(), 2);
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_state() {
        let mut manager = SessionManager::new(
            CountingAuth {
                fail: true,
                ..Default::default()
            },
            Duration::minutes(20),
        );

        assert!(manager.ensure_valid_at(t0()).await.is_err());
        assert!(manager.state().token().is_none());
        assert_eq!(manager.login_count(), 0);
    }

    #[tokio::test]
    async fn invalidate_forces_new_login() {
        let auth = CountingAuth::default();
        let mut manager = SessionManager::new(auth.clone(), Duration::minutes(20));

        manager.ensure_valid_at(t0()).await.unwrap();
        manager.invalidate();
        manager
            .ensure_valid_at(t0() + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_state_is_stale() {
        assert!(SessionState::default().is_stale(t0(), Duration::minutes(20)));
    }
}

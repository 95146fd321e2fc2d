//! Authenticated session handling.
//!
//! The site uses a cookie session that expires after a while. The
//! [`SessionManager`] logs in on first use and again whenever the token is
//! older than the configured validity window.

pub mod login;
pub mod manager;
pub mod markup;

pub use login::{Authenticator, LoginClient};
pub use manager::{SessionManager, SessionState, SessionToken};
pub use markup::{combine_cookies, extract_form_token, extract_session_id};

//! Login flow against the booking site.
//!
//! 1. `GET {base}/login` yields the `PHPSESSID` cookie and the form token
//! 2. `POST {base}/login` with credentials, the token and that cookie
//! 3. Cookies set by the POST are joined with the session id into the
//!    token sent on every later request
//!
//! Redirects are never followed: the POST answers with a redirect whose
//! `set-cookie` headers are the whole point of the exchange.

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{redirect, Client, Response};
use tracing::{debug, info};
use url::Url;

use super::markup::{combine_cookies, extract_form_token, extract_session_id, TOKEN_FIELD};
use crate::config::Credentials;
use crate::error::AuthError;

const USERNAME_FIELD: &str = "login_form[username]";
const PASSWORD_FIELD: &str = "login_form[password]";

/// Anything that can produce a fresh session token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Run the full login exchange and return the cookie header value.
    async fn authenticate(&self) -> Result<String, AuthError>;
}

pub struct LoginClient {
    client: Client,
    login_url: Url,
    credentials: Credentials,
}

impl LoginClient {
    pub fn new(base_url: &Url, credentials: Credentials) -> Result<Self, AuthError> {
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;
        Ok(Self {
            client,
            login_url: join_path(base_url, "login"),
            credentials,
        })
    }
}

#[async_trait]
impl Authenticator for LoginClient {
    async fn authenticate(&self) -> Result<String, AuthError> {
        debug!(url = %self.login_url, "fetching login page");
        let page = self.client.get(self.login_url.clone()).send().await?;
        if !page.status().is_success() {
            return Err(AuthError::UnexpectedStatus {
                status: page.status().as_u16(),
            });
        }

        let page_cookies = set_cookie_values(&page);
        let session_id = extract_session_id(&page_cookies)?;
        let html = page.text().await?;
        let form_token = extract_form_token(&html)?;

        let form = [
            (USERNAME_FIELD, self.credentials.username.as_str()),
            (PASSWORD_FIELD, self.credentials.password.as_str()),
            (TOKEN_FIELD, form_token.as_str()),
        ];

        let resp = self
            .client
            .post(self.login_url.clone())
            .header(COOKIE, format!("PHPSESSID={session_id}"))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(AuthError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let login_cookies = set_cookie_values(&resp);
        if login_cookies.is_empty() {
            return Err(AuthError::MissingSessionCookies {
                status: status.as_u16(),
            });
        }

        info!(
            username = %self.credentials.username,
            cookies = login_cookies.len(),
            "logged in"
        );
        Ok(combine_cookies(&session_id, &login_cookies))
    }
}

fn set_cookie_values(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Append `segment` to the base URL's path, keeping any club prefix.
pub(crate) fn join_path(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    let path = format!("{}/{}", base.path().trim_end_matches('/'), segment);
    url.set_path(&path);
    url
}

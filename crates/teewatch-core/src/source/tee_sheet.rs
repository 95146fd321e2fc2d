//! HTTP client for `GET {base}/tee-sheet/data/{resource}/{date}`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::COOKIE;
use reqwest::{redirect, Client, StatusCode};
use tracing::debug;
use url::Url;

use super::SlotSource;
use crate::error::FetchError;
use crate::session::login::join_path;
use crate::slot::TeeSheetDay;

pub struct TeeSheetClient {
    client: Client,
    base_url: Url,
    resource_id: String,
}

impl TeeSheetClient {
    pub fn new(base_url: Url, resource_id: impl Into<String>) -> Result<Self, FetchError> {
        // An expired session is bounced to the login page; seeing the
        // redirect is how that is detected.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            base_url,
            resource_id: resource_id.into(),
        })
    }

    /// Data URL for `date`, with a cache-busting timestamp.
    pub fn day_url(&self, date: &str, epoch_ms: i64) -> Url {
        let mut url = join_path(
            &self.base_url,
            &format!("tee-sheet/data/{}/{}", self.resource_id, date.trim_matches('/')),
        );
        url.query_pairs_mut().append_pair("_", &epoch_ms.to_string());
        url
    }
}

#[async_trait]
impl SlotSource for TeeSheetClient {
    async fn fetch(&self, date: &str, session_token: &str) -> Result<TeeSheetDay, FetchError> {
        let url = self.day_url(date, Utc::now().timestamp_millis());
        debug!(%url, "fetching tee sheet");

        let resp = self
            .client
            .get(url)
            .header(COOKIE, session_token)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                date: date.to_string(),
                source,
            })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status.is_redirection()
        {
            return Err(FetchError::SessionRejected {
                date: date.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                date: date.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Network {
            date: date.to_string(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            date: date.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> TeeSheetClient {
        let base = Url::parse(&format!("{}/club", server.url())).unwrap();
        TeeSheetClient::new(base, "1").unwrap()
    }

    #[test]
    fn day_url_keeps_date_slashes_and_busts_cache() {
        let client = TeeSheetClient::new(
            Url::parse("https://members.example.com/royalclub").unwrap(),
            "1",
        )
        .unwrap();
        assert_eq!(
            client.day_url("2022/10/15", 1665820800000).as_str(),
            "https://members.example.com/royalclub/tee-sheet/data/1/2022/10/15?_=1665820800000"
        );
    }

    #[tokio::test]
    async fn fetch_sends_session_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/club/tee-sheet/data/1/2022/10/15")
            .match_query(Matcher::Regex(r"^_=\d+$".into()))
            .match_header("cookie", "PHPSESSID=abc; REMEMBERME=r")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"times":{"13:10":{"tee_time":{"bookable":true,"participants":[]}}}}"#)
            .create_async()
            .await;

        let day = client_for(&server)
            .fetch("2022/10/15", "PHPSESSID=abc; REMEMBERME=r")
            .await
            .unwrap();

        assert_eq!(day.len(), 1);
        assert!(day.slot("2022/10/15", "13:10").unwrap().bookable);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn day_without_tee_times_decodes_as_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/club/tee-sheet/data/1/2022/12/25")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"times":[]}"#)
            .create_async()
            .await;

        let day = client_for(&server)
            .fetch("2022/12/25", "PHPSESSID=abc")
            .await
            .unwrap();
        assert!(day.is_empty());
    }

    #[tokio::test]
    async fn redirect_to_login_is_a_session_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/club/tee-sheet/data/1/2022/10/15")
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("location", "/club/login")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch("2022/10/15", "PHPSESSID=old")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SessionRejected { status: 302, .. }));
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/club/tee-sheet/data/1/2022/10/15")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch("2022/10/15", "PHPSESSID=abc")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn html_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/club/tee-sheet/data/1/2022/10/15")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch("2022/10/15", "PHPSESSID=abc")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}

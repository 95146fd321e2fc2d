//! Mailgun e-mail transport.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::{FoundSlot, NotificationMessage, Notifier};
use crate::config::{MailgunConfig, NotificationConfig};
use crate::error::NotificationError;

pub struct MailgunNotifier {
    client: Client,
    mailgun: MailgunConfig,
    addressing: NotificationConfig,
}

impl MailgunNotifier {
    pub fn new(mailgun: MailgunConfig, addressing: NotificationConfig) -> Self {
        Self {
            client: Client::new(),
            mailgun,
            addressing,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.mailgun.api_base.trim_end_matches('/'),
            self.mailgun.domain
        )
    }

    pub async fn send(&self, message: &NotificationMessage) -> Result<(), NotificationError> {
        let to = message.to.join(", ");
        let cc = message.cc.join(", ");
        let mut form = vec![
            ("from", message.from.as_str()),
            ("to", to.as_str()),
            ("subject", message.subject.as_str()),
            ("html", message.html.as_str()),
        ];
        if !cc.is_empty() {
            form.push(("cc", cc.as_str()));
        }

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.mailgun.api_key))
            .form(&form)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(NotificationError::Rejected { status, body })
        }
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn notify(&self, found: &FoundSlot) -> Result<(), NotificationError> {
        let message = NotificationMessage::for_slot(found, &self.addressing);
        self.send(&message).await?;
        info!(
            date = %found.date,
            time = %found.time,
            recipients = message.to.len() + message.cc.len(),
            "notification sent"
        );
        Ok(())
    }
}

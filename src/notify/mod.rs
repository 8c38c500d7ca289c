pub mod templates;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail transport failure: {0}")]
    Transport(String),
    #[error("mail API returned status {0}")]
    Api(u16),
}

/// One outbound message. The workflow fills this from a template and the
/// owner's account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound notification seam. Sends are at-most-once; the caller decides
/// whether a failure matters.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Transactional mail over a plain HTTP API. No retries; a failed send is
/// reported to the caller once and never re-attempted.
pub struct MailApiNotifier {
    client: Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl MailApiNotifier {
    pub fn new(api_url: String, api_key: String, sender: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url,
            api_key,
            sender,
        }
    }
}

#[async_trait]
impl Notifier for MailApiNotifier {
    async fn send(&self, email: Email) -> Result<(), NotifyError> {
        let body = MailApiRequest {
            from: &self.sender,
            to: &email.to,
            subject: &email.subject,
            text: &email.body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Api(status.as_u16()))
        }
    }
}

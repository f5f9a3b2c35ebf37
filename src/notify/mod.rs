//! Outgoing e-mail notifications for booking and contact inquiries.
//!
//! The owner receives every inquiry; the guest receives a confirmation in the
//! language the form was submitted in.

mod templates;

pub use templates::*;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Config;
use crate::errors::AppError;

/// A plain-text e-mail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

/// E-mail dispatch collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;
}

/// Posts messages as JSON to an HTTP mail relay.
pub struct RelayNotifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RelayNotifier {
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let mut request = self.client.post(&self.url).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Mail relay answered {}",
                response.status()
            )));
        }

        tracing::info!("Sent \"{}\" to {}", message.subject, message.to);
        Ok(())
    }
}

/// Writes messages to the log instead of sending them.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail relay not configured, message not sent:\n{}",
            message.text
        );
        Ok(())
    }
}

/// Relay notifier when a relay URL is configured, log-only otherwise.
pub fn from_config(config: &Config) -> Result<Arc<dyn Notifier>, AppError> {
    match &config.mail_relay_url {
        Some(url) => Ok(Arc::new(RelayNotifier::new(
            url.clone(),
            config.mail_relay_key.clone(),
            config.fetch_timeout,
        )?)),
        None => {
            tracing::warn!("CHATA_MAIL_RELAY_URL not set; notifications are only logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

/// Deliver the owner notification, then the confirmation.
///
/// Only a failed owner notification fails the inquiry.
pub async fn deliver(
    notifier: &dyn Notifier,
    owner: &EmailMessage,
    confirmation: &EmailMessage,
) -> Result<(), AppError> {
    notifier.send(owner).await?;

    if let Err(e) = notifier.send(confirmation).await {
        tracing::warn!("Confirmation to {} failed: {}", confirmation.to, e);
    }
    Ok(())
}

// src/services/notifier.rs

//! Notification sinks.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{NotifierConfig, NotifierKind};

/// A formatted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// Destination for notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, message: &Message) -> Result<()> {
        log::info!("[notify] {}\n{}", message.subject, message.body);
        Ok(())
    }
}

/// POSTs notifications as JSON to a webhook.
pub struct WebhookSink {
    client: Client,
    url: String,
    recipient: Option<String>,
    token: Option<String>,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    subject: &'a str,
    body: &'a str,
}

impl WebhookSink {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            recipient: None,
            token: None,
        }
    }

    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, message: &Message) -> Result<()> {
        let payload = WebhookPayload {
            to: self.recipient.as_deref(),
            subject: &message.subject,
            body: &message.body,
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(AppError::notification)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notification(format!(
                "webhook returned {}",
                status
            )));
        }
        Ok(())
    }
}

/// Build the sink described by the configuration.
pub fn build_sink(config: &NotifierConfig, client: Client) -> Result<Box<dyn NotificationSink>> {
    match config.kind {
        NotifierKind::Log => Ok(Box::new(LogSink)),
        NotifierKind::Webhook => {
            let url = config
                .webhook_url
                .clone()
                .ok_or_else(|| AppError::config("notifier.webhook_url is not set"))?;
            Ok(Box::new(
                WebhookSink::new(client, url)
                    .with_recipient(config.recipient.clone())
                    .with_token(config.token.clone()),
            ))
        }
    }
}

use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::error::PipelineError;
use crate::models::{Notification, NotificationSeverity};

/// Posts notifications as JSON to a fixed URL
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub async fn deliver(&self, notification: &Notification) -> Result<(), PipelineError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| PipelineError::Notification(format!("POST {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Notification(format!(
                "webhook returned {} - {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Where agent notifications go
#[derive(Debug, Clone, Default)]
pub enum NotificationSink {
    /// Emit through tracing
    #[default]
    Log,
    Webhook(WebhookSink),
}

impl NotificationSink {
    pub async fn deliver(&self, notification: &Notification) -> Result<(), PipelineError> {
        match self {
            NotificationSink::Log => {
                let severity = match notification.severity {
                    NotificationSeverity::Info => "info",
                    NotificationSeverity::Warning => "warning",
                    NotificationSeverity::Critical => "critical",
                };
                info!(
                    "[{}] {} ({}): {} - {}",
                    notification.channel,
                    notification.agent.as_str(),
                    severity,
                    notification.title,
                    notification.body
                );
                Ok(())
            }
            NotificationSink::Webhook(sink) => sink.deliver(notification).await,
        }
    }
}

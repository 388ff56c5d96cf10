use crate::error::PublishError;
use async_trait::async_trait;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, message: &str) -> Result<(), PublishError>;
}

pub struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", message)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Posts to a Discord-style incoming webhook as `{"content": ...}`.
pub struct WebhookPublisher {
    webhook_url: String,
    http: reqwest::Client,
}

impl WebhookPublisher {
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { webhook_url, http })
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "content": message }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Webhook returned non-success");
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Route message posted to webhook");
        Ok(())
    }
}

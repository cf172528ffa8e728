//! Forwarding collected data to the downstream queue.
//!
//! The queue URL picks the transport: `http://` / `https://` endpoints receive
//! the message as a JSON POST, `file://` URLs name a spool directory where
//! each user's latest message is written as `{user_id}.json`.

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("unsupported queue url: {0}")]
    UnsupportedUrl(String),

    #[error("failed to send message to queue: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("queue rejected message with status {0}")]
    Rejected(StatusCode),

    #[error("user id cannot name a spool file: {0:?}")]
    InvalidUserId(String),

    #[error("failed to write message to spool: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Places one encoded message on the queue.
    async fn publish(&self, user_id: &str, body: &str) -> Result<(), PublishError>;
}

pub struct HttpQueue {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpQueue {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        HttpQueue {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl QueuePublisher for HttpQueue {
    async fn publish(&self, user_id: &str, body: &str) -> Result<(), PublishError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Rejected(status));
        }

        info!(user_id, url = %self.url, "message sent to queue");
        Ok(())
    }
}

pub struct SpoolQueue {
    dir: PathBuf,
}

impl SpoolQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SpoolQueue { dir: dir.into() }
    }

    /// File the message for `user_id` is written to.
    ///
    /// The id comes from the incoming event, so anything that could leave the
    /// spool directory (separators, `..`, an empty id) is refused.
    pub fn message_path(&self, user_id: &str) -> Result<PathBuf, PublishError> {
        let unsafe_id = user_id.is_empty()
            || user_id == "."
            || user_id.contains("..")
            || user_id.contains(['/', '\\', '\0']);
        if unsafe_id {
            return Err(PublishError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.dir.join(format!("{user_id}.json")))
    }
}

#[async_trait]
impl QueuePublisher for SpoolQueue {
    async fn publish(&self, user_id: &str, body: &str) -> Result<(), PublishError> {
        let path = self.message_path(user_id)?;
        async_fs::create_dir_all(&self.dir).await?;
        async_fs::write(&path, body).await?;

        info!(user_id, path = %path.display(), "message written to spool");
        Ok(())
    }
}

/// Picks the publisher matching the scheme of `queue_url`.
pub fn publisher_for(
    queue_url: &str,
    client: Client,
    timeout: Duration,
) -> Result<Box<dyn QueuePublisher>, PublishError> {
    if let Some(dir) = queue_url.strip_prefix("file://") {
        if dir.is_empty() {
            return Err(PublishError::UnsupportedUrl(queue_url.to_string()));
        }
        return Ok(Box::new(SpoolQueue::new(dir)));
    }

    if queue_url.starts_with("http://") || queue_url.starts_with("https://") {
        return Ok(Box::new(HttpQueue::new(client, queue_url, timeout)));
    }

    Err(PublishError::UnsupportedUrl(queue_url.to_string()))
}

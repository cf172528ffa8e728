//! One invocation: one queue event in, at most one queue message out.

use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    config::Settings,
    error::ServiceError,
    event::EventError,
    management::UserDataCollector,
    queue::{PublishError, QueuePublisher},
    spotify::SpotifyApi,
    types::{QueueMessage, User, UserTopItems},
};

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to encode queue message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub user_id: String,
    pub data: UserTopItems,
}

/// Handles one queue event end to end.
///
/// `client` is owned for the duration of the call and released on every
/// exit path. Nothing is published unless the whole collection succeeded.
pub async fn handle_event(
    event: &Value,
    settings: &Settings,
    client: Client,
    publisher: &dyn QueuePublisher,
) -> Result<Invocation, HandlerError> {
    let user = User::from_event(event).inspect_err(|e| error!(error = %e, "invalid event"))?;
    info!(user_id = %user.id, "handling user");

    let collector = UserDataCollector::new(SpotifyApi::from_settings(client, settings));
    let data = collector.collect(&user.refresh_token).await?;

    if data.refresh_token.is_none() {
        info!(user_id = %user.id, "refresh token not rotated; existing token stays valid");
    }

    let body = QueueMessage::new(&user.id, &data).to_json()?;
    publisher
        .publish(&user.id, &body)
        .await
        .inspect_err(|e| error!(user_id = %user.id, error = %e, "failed to publish"))?;

    Ok(Invocation {
        user_id: user.id,
        data,
    })
}

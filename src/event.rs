//! Decoding of the incoming queue event.
//!
//! An event looks like `{"Records": [{"body": "<json>"}]}` where the body is
//! a JSON string holding `user_id` and `refresh_token`. Only the first record
//! is used: one invocation handles one user.

use serde::Deserialize;
use serde_json::Value;

use crate::types::User;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("malformed queue event: {0}")]
    Malformed(serde_json::Error),

    #[error("queue event contains no records")]
    NoRecords,

    #[error("message body is not valid: {0}")]
    InvalidBody(serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct QueueEvent {
    #[serde(rename = "Records")]
    records: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    body: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    user_id: String,
    refresh_token: String,
}

impl User {
    pub fn from_event(event: &Value) -> Result<User, EventError> {
        let event = QueueEvent::deserialize(event).map_err(EventError::Malformed)?;
        let record = event.records.into_iter().next().ok_or(EventError::NoRecords)?;
        let body: MessageBody =
            serde_json::from_str(&record.body).map_err(EventError::InvalidBody)?;

        Ok(User {
            id: body.user_id,
            refresh_token: body.refresh_token,
        })
    }
}

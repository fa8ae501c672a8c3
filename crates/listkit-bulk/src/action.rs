//! Collaborator traits for loading records and acting on them.
//!
//! Both traits are implemented by the application (usually over an HTTP
//! client). listkit only calls them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ActionError, SourceError};

/// Reply of a remote per-record action.
///
/// Some services answer `200 OK` with `success: false`; that still counts
/// as a failure for the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionReply {
    /// A successful reply with no message.
    pub fn ok() -> Self {
        ActionReply {
            success: true,
            message: None,
        }
    }

    /// A successful reply carrying a message.
    pub fn ok_with(message: impl Into<String>) -> Self {
        ActionReply {
            success: true,
            message: Some(message.into()),
        }
    }

    /// A reply reporting that the action was not applied.
    pub fn refused(message: impl Into<String>) -> Self {
        ActionReply {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Loads the raw collection for a list screen.
#[async_trait]
pub trait RecordSource<T: Send + 'static>: Send + Sync {
    async fn fetch(&self) -> Result<Vec<T>, SourceError>;
}

/// A remote action applied to one record at a time, e.g. "delete" or
/// "mark as shipped".
#[async_trait]
pub trait RecordAction<Id: Send + 'static>: Send + Sync {
    /// Label used in logs and summaries.
    fn name(&self) -> &str {
        "action"
    }

    async fn perform(&self, id: Id) -> Result<ActionReply, ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_deserializes_without_message() {
        let reply: ActionReply = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(reply, ActionReply::ok());

        let reply: ActionReply =
            serde_json::from_str(r#"{"success":false,"message":"locked"}"#).unwrap();
        assert_eq!(reply, ActionReply::refused("locked"));
    }

    #[test]
    fn ok_reply_omits_empty_message() {
        let json = serde_json::to_string(&ActionReply::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
        assert!(ActionReply::ok_with("done").success);
    }
}

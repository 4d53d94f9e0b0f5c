//! Management links returned by the async 202 pattern.

use serde::{Deserialize, Serialize};

/// Placeholder left in `send_event_post_uri` for the caller to substitute.
pub const EVENT_NAME_PLACEHOLDER: &str = "{eventName}";

/// Placeholder left in the terminate / rewind URLs.
pub const REASON_PLACEHOLDER: &str = "{text}";

/// Callback URLs for one instance.
///
/// Derived per request from configuration; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementLinks {
    pub id: String,
    pub status_query_get_uri: String,
    pub send_event_post_uri: String,
    pub terminate_post_uri: String,
    pub rewind_post_uri: String,
}

/// Task hub / connection overrides declared by the caller.
///
/// Query parameters on the request win over these; these win over configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingAttributes {
    pub task_hub: Option<String>,
    pub connection: Option<String>,
}

impl RoutingAttributes {
    pub fn new(task_hub: Option<String>, connection: Option<String>) -> Self {
        Self { task_hub, connection }
    }

    /// `self` where set, otherwise `fallback`.
    pub fn or(self, fallback: &RoutingAttributes) -> Self {
        Self {
            task_hub: self.task_hub.or_else(|| fallback.task_hub.clone()),
            connection: self.connection.or_else(|| fallback.connection.clone()),
        }
    }
}

//! Status snapshot and its API view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::status::RuntimeStatus;

/// Point-in-time read of one instance, owned by the runtime.
///
/// Fetched fresh for every request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub instance_id: String,
    /// Orchestration (function) name.
    pub name: String,
    pub runtime_status: RuntimeStatus,
    pub input: Value,
    pub output: Value,
    pub custom_status: Value,
    pub created_time: DateTime<Utc>,
    pub last_updated_time: DateTime<Utc>,
    /// Only populated when history was requested from the runtime.
    pub history: Option<Vec<Value>>,
}

impl StatusSnapshot {
    /// Snapshot with null payloads and both timestamps set to `created`.
    pub fn new(
        instance_id: impl Into<String>,
        name: impl Into<String>,
        runtime_status: RuntimeStatus,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            name: name.into(),
            runtime_status,
            input: Value::Null,
            output: Value::Null,
            custom_status: Value::Null,
            created_time: created,
            last_updated_time: created,
            history: None,
        }
    }
}

/// Serializable view of a snapshot for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView<'a> {
    pub name: &'a str,
    pub instance_id: &'a str,
    pub runtime_status: RuntimeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<&'a Value>,
    pub custom_status: &'a Value,
    pub output: &'a Value,
    #[serde(serialize_with = "serialize_utc")]
    pub created_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_utc")]
    pub last_updated_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_events: Option<&'a [Value]>,
}

impl<'a> StatusView<'a> {
    /// `show_history` drops runtime-supplied history unless the caller asked for it.
    pub fn new(snapshot: &'a StatusSnapshot, show_input: bool, show_history: bool) -> Self {
        Self {
            name: &snapshot.name,
            instance_id: &snapshot.instance_id,
            runtime_status: snapshot.runtime_status,
            input: show_input.then_some(&snapshot.input),
            custom_status: &snapshot.custom_status,
            output: &snapshot.output,
            created_time: snapshot.created_time,
            last_updated_time: snapshot.last_updated_time,
            history_events: if show_history {
                snapshot.history.as_deref()
            } else {
                None
            },
        }
    }
}

/// ISO-8601 UTC with second precision and a trailing `Z`.
pub fn format_utc(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn serialize_utc<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_utc(time))
}

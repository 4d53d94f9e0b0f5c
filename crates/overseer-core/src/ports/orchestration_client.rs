//! OrchestrationClient port - 外部オーケストレーションランタイムへの窓口
//!
//! 状態の保存・実行・履歴はすべてランタイム側の責務です。
//! このクレートは状態を読み、terminate / rewind / raise-event を依頼するだけで、
//! インスタンス単位のロックや read-modify-write は行いません。

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{RuntimeStatus, StatusSnapshot};

/// Error returned by a client implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The runtime could not be reached or timed out.
    #[error("runtime unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Filter for listing instances. Empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub statuses: BTreeSet<RuntimeStatus>,
    pub instance_id_prefix: Option<String>,
}

impl InstanceFilter {
    /// Whether `snapshot` passes every set constraint. Both time bounds are inclusive.
    pub fn matches(&self, snapshot: &StatusSnapshot) -> bool {
        if let Some(from) = self.created_from
            && snapshot.created_time < from
        {
            return false;
        }
        if let Some(to) = self.created_to
            && snapshot.created_time > to
        {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&snapshot.runtime_status) {
            return false;
        }
        match &self.instance_id_prefix {
            Some(prefix) => snapshot.instance_id.starts_with(prefix.as_str()),
            None => true,
        }
    }
}

/// Capability interface the façade needs from the orchestration runtime.
///
/// # Thread Safety
/// - `Send + Sync` を要求（リクエストごとに並行して呼ばれる）
/// - 同一インスタンスへの並行呼び出しの直列化はランタイム側の責務
#[async_trait]
pub trait OrchestrationClient: Send + Sync {
    /// Current status without history. `Ok(None)` when the instance does not exist.
    async fn get_status(&self, instance_id: &str) -> Result<Option<StatusSnapshot>, ClientError> {
        self.get_status_with_history(instance_id, false, false).await
    }

    async fn get_status_with_history(
        &self,
        instance_id: &str,
        show_history: bool,
        show_history_output: bool,
    ) -> Result<Option<StatusSnapshot>, ClientError>;

    /// All instances matching `filter`, in runtime-determined order.
    async fn list_statuses(&self, filter: &InstanceFilter) -> Result<Vec<StatusSnapshot>, ClientError>;

    /// Request termination. Completes asynchronously on the runtime side.
    async fn terminate(&self, instance_id: &str, reason: Option<&str>) -> Result<(), ClientError>;

    async fn rewind(&self, instance_id: &str, reason: Option<&str>) -> Result<(), ClientError>;

    /// Deliver an external event; `payload` is `Value::Null` for an empty body.
    async fn raise_event(
        &self,
        instance_id: &str,
        event_name: &str,
        payload: Value,
    ) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot(id: &str, status: RuntimeStatus, day: u32) -> StatusSnapshot {
        let created = Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap();
        StatusSnapshot::new(id, "Orchestrator", status, created)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = InstanceFilter::default();
        assert!(filter.matches(&snapshot("a", RuntimeStatus::Running, 1)));
        assert!(filter.matches(&snapshot("b", RuntimeStatus::Unknown, 30)));
    }

    #[test]
    fn time_bounds_are_inclusive() {
        let filter = InstanceFilter {
            created_from: Some(Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()),
            created_to: Some(Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!filter.matches(&snapshot("a", RuntimeStatus::Running, 9)));
        assert!(filter.matches(&snapshot("b", RuntimeStatus::Running, 10)));
        assert!(filter.matches(&snapshot("c", RuntimeStatus::Running, 20)));
        assert!(!filter.matches(&snapshot("d", RuntimeStatus::Running, 21)));
    }

    #[test]
    fn status_set_and_prefix_constrain() {
        let filter = InstanceFilter {
            statuses: [RuntimeStatus::Completed, RuntimeStatus::Failed].into_iter().collect(),
            instance_id_prefix: Some("order-".into()),
            ..Default::default()
        };
        assert!(filter.matches(&snapshot("order-1", RuntimeStatus::Failed, 1)));
        assert!(!filter.matches(&snapshot("order-2", RuntimeStatus::Running, 1)));
        assert!(!filter.matches(&snapshot("invoice-1", RuntimeStatus::Completed, 1)));
    }
}

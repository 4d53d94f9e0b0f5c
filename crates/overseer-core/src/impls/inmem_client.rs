//! InMemoryOrchestrationClient - 開発・テスト用のランタイムクライアント
//!
//! # 実装詳細
//! - Vec<StatusSnapshot> で挿入順を保持（一覧はこの順で返す）
//! - tokio::sync::Mutex で排他制御
//! - terminate / rewind / raise-event の呼び出しをすべて記録し、
//!   テストで「呼ばれなかったこと」を確認できる
//!
//! 本物のランタイムでは terminate は非同期に反映されますが、
//! ここでは即座に状態を書き換えます。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{RuntimeStatus, StatusSnapshot};
use crate::ports::{
    ClientError, Clock, InstanceFilter, InstanceIdGenerator, OrchestrationClient, SystemClock,
    UlidGenerator,
};

/// A mutating call received by the in-memory client.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Terminate {
        instance_id: String,
        reason: Option<String>,
    },
    Rewind {
        instance_id: String,
        reason: Option<String>,
    },
    RaiseEvent {
        instance_id: String,
        event_name: String,
        payload: Value,
    },
}

pub struct InMemoryOrchestrationClient {
    instances: Mutex<Vec<StatusSnapshot>>,
    calls: Mutex<Vec<RecordedCall>>,
    clock: Arc<dyn Clock>,
    id_generator: Box<dyn InstanceIdGenerator>,
}

impl InMemoryOrchestrationClient {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Timestamps and generated ids follow `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            instances: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            id_generator: Box::new(UlidGenerator::new(clock.clone())),
            clock,
        }
    }

    /// Insert or replace a snapshot. A replaced instance keeps its list position.
    pub async fn insert(&self, snapshot: StatusSnapshot) {
        let mut instances = self.instances.lock().await;
        match instances
            .iter_mut()
            .find(|existing| existing.instance_id == snapshot.instance_id)
        {
            Some(existing) => *existing = snapshot,
            None => instances.push(snapshot),
        }
    }

    /// Start a new `Pending` instance and return its generated id.
    pub async fn start_instance(&self, name: &str, input: Value) -> String {
        let instance_id = self.id_generator.generate();
        let mut snapshot =
            StatusSnapshot::new(instance_id.clone(), name, RuntimeStatus::Pending, self.clock.now());
        snapshot.input = input;
        self.insert(snapshot).await;
        tracing::debug!(instance_id = %instance_id, name, "started in-memory instance");
        instance_id
    }

    /// Returns false when the instance does not exist.
    pub async fn set_status(&self, instance_id: &str, status: RuntimeStatus) -> bool {
        let now = self.clock.now();
        self.update(instance_id, |snapshot| {
            snapshot.runtime_status = status;
            snapshot.last_updated_time = now;
        })
        .await
    }

    /// Mark the instance `Completed` with `output`.
    pub async fn complete(&self, instance_id: &str, output: Value) -> bool {
        let now = self.clock.now();
        self.update(instance_id, |snapshot| {
            snapshot.runtime_status = RuntimeStatus::Completed;
            snapshot.output = output;
            snapshot.last_updated_time = now;
        })
        .await
    }

    /// Every mutating call received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    async fn update(&self, instance_id: &str, apply: impl FnOnce(&mut StatusSnapshot)) -> bool {
        let mut instances = self.instances.lock().await;
        match instances
            .iter_mut()
            .find(|snapshot| snapshot.instance_id == instance_id)
        {
            Some(snapshot) => {
                apply(snapshot);
                true
            }
            None => false,
        }
    }

    async fn record(&self, call: RecordedCall) {
        self.calls.lock().await.push(call);
    }
}

impl Default for InMemoryOrchestrationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrchestrationClient for InMemoryOrchestrationClient {
    async fn get_status_with_history(
        &self,
        instance_id: &str,
        show_history: bool,
        show_history_output: bool,
    ) -> Result<Option<StatusSnapshot>, ClientError> {
        let instances = self.instances.lock().await;
        let Some(found) = instances.iter().find(|s| s.instance_id == instance_id) else {
            return Ok(None);
        };

        let mut snapshot = found.clone();
        if !show_history {
            snapshot.history = None;
        } else if !show_history_output && let Some(events) = snapshot.history.as_mut() {
            for event in events.iter_mut() {
                if let Value::Object(fields) = event {
                    fields.remove("Result");
                }
            }
        }
        Ok(Some(snapshot))
    }

    async fn list_statuses(&self, filter: &InstanceFilter) -> Result<Vec<StatusSnapshot>, ClientError> {
        let instances = self.instances.lock().await;
        Ok(instances
            .iter()
            .filter(|snapshot| filter.matches(snapshot))
            .map(|snapshot| StatusSnapshot {
                history: None,
                ..snapshot.clone()
            })
            .collect())
    }

    async fn terminate(&self, instance_id: &str, reason: Option<&str>) -> Result<(), ClientError> {
        self.record(RecordedCall::Terminate {
            instance_id: instance_id.to_string(),
            reason: reason.map(str::to_string),
        })
        .await;

        let now = self.clock.now();
        let output = reason.map_or(Value::Null, |r| Value::String(r.to_string()));
        if !self
            .update(instance_id, |snapshot| {
                snapshot.runtime_status = RuntimeStatus::Terminated;
                snapshot.output = output;
                snapshot.last_updated_time = now;
            })
            .await
        {
            return Err(ClientError::Other(format!("no instance '{instance_id}'")));
        }
        Ok(())
    }

    async fn rewind(&self, instance_id: &str, reason: Option<&str>) -> Result<(), ClientError> {
        self.record(RecordedCall::Rewind {
            instance_id: instance_id.to_string(),
            reason: reason.map(str::to_string),
        })
        .await;

        if !self.set_status(instance_id, RuntimeStatus::Running).await {
            return Err(ClientError::Other(format!("no instance '{instance_id}'")));
        }
        Ok(())
    }

    async fn raise_event(
        &self,
        instance_id: &str,
        event_name: &str,
        payload: Value,
    ) -> Result<(), ClientError> {
        self.record(RecordedCall::RaiseEvent {
            instance_id: instance_id.to_string(),
            event_name: event_name.to_string(),
            payload,
        })
        .await;
        Ok(())
    }
}

//! Completion waiter - 同期的に完了を待ち、間に合わなければ 202 に落とす
//!
//! # ループ
//! 1. 状態を取得
//! 2. Completed なら 200 + output
//! 3. Failed / Canceled / Terminated なら単一ステータス応答に委譲
//! 4. それ以外は min(残り時間, 間隔) だけ sleep
//! 5. 予算を使い切ったら check-status 応答（202 + links）
//!
//! 時刻と sleep は Clock 経由なので、テストでは ManualClock で即座に進みます。

use std::time::Duration;

use http::StatusCode;
use tracing::debug;

use super::handler::HttpApiHandler;
use super::response::{ApiResponse, RequestContext, json_response};
use crate::domain::{ApiError, RoutingAttributes, RuntimeStatus};

impl HttpApiHandler {
    /// Wait up to `timeout` for the instance to finish, checking every `poll_interval`.
    ///
    /// # Errors
    /// - `ApiError::Validation` when `poll_interval` is zero or exceeds `timeout` (no runtime query is made)
    /// - `ApiError::Configuration` when falling back without a notification URL
    pub async fn wait_or_accept(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ApiResponse, ApiError> {
        self.wait_or_accept_with(ctx, instance_id, &RoutingAttributes::default(), timeout, poll_interval)
            .await
    }

    /// [`wait_or_accept`](Self::wait_or_accept) with routing attributes for the fallback links.
    pub async fn wait_or_accept_with(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        attributes: &RoutingAttributes,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ApiResponse, ApiError> {
        if poll_interval.is_zero() {
            return Err(ApiError::validation("Retry timeout should be bigger than zero"));
        }
        if poll_interval > timeout {
            return Err(ApiError::validation(format!(
                "Total timeout {}s should be bigger than retry timeout {}s",
                timeout.as_secs_f64(),
                poll_interval.as_secs_f64()
            )));
        }

        let started = self.clock.now();
        loop {
            let snapshot = self.client.get_status(instance_id).await?;
            debug!(instance_id, status = ?snapshot.as_ref().map(|s| s.runtime_status), "polled");
            if let Some(snapshot) = snapshot {
                match snapshot.runtime_status {
                    RuntimeStatus::Completed => {
                        debug!(instance_id, "instance completed while waiting");
                        return Ok(json_response(StatusCode::OK, &snapshot.output));
                    }
                    RuntimeStatus::Failed | RuntimeStatus::Canceled | RuntimeStatus::Terminated => {
                        return self.get_status(ctx, instance_id).await;
                    }
                    _ => {}
                }
            }

            let elapsed = (self.clock.now() - started).to_std().unwrap_or(Duration::ZERO);
            if elapsed >= timeout {
                debug!(instance_id, ?timeout, "wait budget exhausted; accepting");
                return self.create_check_status_response(ctx, instance_id, attributes);
            }
            self.clock.sleep((timeout - elapsed).min(poll_interval)).await;
        }
    }
}

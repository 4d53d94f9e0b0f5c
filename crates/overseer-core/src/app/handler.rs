//! HttpApiHandler - インスタンス管理 API の本体
//!
//! # 処理の流れ
//! 1. Router でパスを操作に振り分け
//! 2. Query でパラメータを読む（不正値はデフォルトに落とす）
//! 3. OrchestrationClient で現在の状態を取得（毎回取り直す、キャッシュしない）
//! 4. 状態ゲートを通過したら操作を依頼、または StatusTranslator で応答を決める
//!
//! すべてのエラーはこのリクエスト内で HTTP 応答に変換されます。

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, error, info};

use super::links::LinkBuilder;
use super::query::{
    CONNECTION, CREATED_TIME_FROM, CREATED_TIME_TO, INSTANCE_ID_PREFIX, REASON, RUNTIME_STATUS,
    SHOW_HISTORY, SHOW_HISTORY_OUTPUT, SHOW_INPUT, TASK_HUB,
};
use super::response::{
    ApiRequest, ApiResponse, RequestContext, empty_response, error_response, json_response,
    with_location, with_retry_after,
};
use super::router::Route;
use super::translator::{CHECK_STATUS_RETRY_AFTER, StatusTranslation};
use crate::config::HttpApiConfig;
use crate::domain::{
    ApiError, ManagementLinks, RoutingAttributes, RuntimeStatus, StatusSnapshot, StatusView,
};
use crate::ports::{Clock, InstanceFilter, OrchestrationClient};

const JSON_MEDIA_TYPE: &str = "application/json";

/// HTTP façade over an [`OrchestrationClient`].
///
/// Holds only immutable configuration and shared handles, so one instance
/// serves any number of concurrent requests.
pub struct HttpApiHandler {
    pub(crate) config: Arc<HttpApiConfig>,
    pub(crate) client: Arc<dyn OrchestrationClient>,
    pub(crate) clock: Arc<dyn Clock>,
    links: LinkBuilder,
}

impl HttpApiHandler {
    pub fn new(
        config: Arc<HttpApiConfig>,
        client: Arc<dyn OrchestrationClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            links: LinkBuilder::new(config.clone()),
            config,
            client,
            clock,
        }
    }

    pub fn config(&self) -> &HttpApiConfig {
        &self.config
    }

    /// Entry point for hosts: route and answer one request.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let ctx = self.request_context(request);
        self.route(&ctx).await
    }

    /// Relative request URIs take the scheme of the notification URL (`http` when unset).
    pub fn request_context(&self, request: ApiRequest) -> RequestContext {
        let scheme = self
            .config
            .notification_url
            .as_ref()
            .map_or("http", |url| url.scheme());
        RequestContext::from_request_with_scheme(request, scheme)
    }

    pub async fn route(&self, ctx: &RequestContext) -> ApiResponse {
        let route = Route::resolve(&ctx.method, &ctx.path);
        debug!(method = %ctx.method, path = %ctx.path, route = ?route, "routing request");

        let result = match route {
            Route::ListStatus => self.list_status(ctx).await,
            Route::Status { instance_id } => self.get_status(ctx, &instance_id).await,
            Route::Terminate { instance_id } => self.terminate(ctx, &instance_id).await,
            Route::Rewind { instance_id } => self.rewind(ctx, &instance_id).await,
            Route::RaiseEvent {
                instance_id,
                event_name,
            } => self.raise_event(ctx, &instance_id, &event_name).await,
            Route::NoSuchApi => Err(ApiError::validation("No such API")),
            Route::NotFound => Ok(empty_response(StatusCode::NOT_FOUND)),
        };
        result.unwrap_or_else(failure_response)
    }

    /// `GET /instances/` with optional `createdTimeFrom`, `createdTimeTo`,
    /// `runtimeStatus`, `instanceIdPrefix` filters.
    pub async fn list_status(&self, ctx: &RequestContext) -> Result<ApiResponse, ApiError> {
        let filter = InstanceFilter {
            created_from: ctx.query.parse_optional_date_time(CREATED_TIME_FROM),
            created_to: ctx.query.parse_optional_date_time(CREATED_TIME_TO),
            statuses: ctx.query.parse_status_set(RUNTIME_STATUS),
            instance_id_prefix: ctx.query.get_non_empty(INSTANCE_ID_PREFIX).map(str::to_string),
        };
        let show_input = ctx.query.parse_bool_or(SHOW_INPUT, true);

        let snapshots = self.client.list_statuses(&filter).await?;
        debug!(count = snapshots.len(), filter = ?filter, "listed instances");

        let views: Vec<StatusView<'_>> = snapshots
            .iter()
            .map(|snapshot| StatusView::new(snapshot, show_input, false))
            .collect();
        Ok(json_response(StatusCode::OK, &views))
    }

    /// `GET /instances/{id}`; response code follows [`StatusTranslation`].
    pub async fn get_status(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<ApiResponse, ApiError> {
        let show_history = ctx.query.parse_bool(SHOW_HISTORY);
        let show_history_output = ctx.query.parse_bool(SHOW_HISTORY_OUTPUT);
        let show_input = ctx.query.parse_bool_or(SHOW_INPUT, true);

        let snapshot = self
            .client
            .get_status_with_history(instance_id, show_history, show_history_output)
            .await?
            .ok_or_else(|| ApiError::NotFound(instance_id.to_string()))?;

        let translation = StatusTranslation::for_status(snapshot.runtime_status);
        let view = StatusView::new(&snapshot, show_input, show_history);
        let mut response = json_response(translation.code, &view);
        if translation.location {
            response = with_location(response, &ctx.location());
        }
        if let Some(after) = translation.retry_after {
            response = with_retry_after(response, after);
        }
        Ok(response)
    }

    /// `POST /instances/{id}/terminate?reason=`; 410 once any terminal state is reached.
    pub async fn terminate(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<ApiResponse, ApiError> {
        let snapshot = self.require_instance(instance_id).await?;
        ensure_applicable(&snapshot, "terminate", RuntimeStatus::is_terminal)?;

        let reason = ctx.query.get(REASON);
        self.client.terminate(instance_id, reason).await?;
        info!(instance_id, reason = ?reason, "terminate requested");
        Ok(empty_response(StatusCode::ACCEPTED))
    }

    /// `POST /instances/{id}/rewind?reason=`; Failed instances stay rewindable.
    pub async fn rewind(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<ApiResponse, ApiError> {
        let snapshot = self.require_instance(instance_id).await?;
        ensure_applicable(&snapshot, "rewind", |status| !status.is_rewindable())?;

        let reason = ctx.query.get(REASON);
        self.client.rewind(instance_id, reason).await?;
        info!(instance_id, reason = ?reason, "rewind requested");
        Ok(empty_response(StatusCode::ACCEPTED))
    }

    /// `POST /instances/{id}/raiseEvent/{eventName}` with a JSON (or empty) body.
    pub async fn raise_event(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        event_name: &str,
    ) -> Result<ApiResponse, ApiError> {
        let snapshot = self.require_instance(instance_id).await?;
        ensure_applicable(&snapshot, "raise event", RuntimeStatus::is_terminal)?;

        if ctx.media_type().as_deref() != Some(JSON_MEDIA_TYPE) {
            return Err(ApiError::validation(
                "Only application/json request content is supported",
            ));
        }
        let payload = if ctx.body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&ctx.body)
                .map_err(|e| ApiError::validation(format!("Invalid JSON content: {e}")))?
        };

        self.client
            .raise_event(instance_id, event_name, payload)
            .await?;
        info!(instance_id, event_name, "event raised");
        Ok(empty_response(StatusCode::ACCEPTED))
    }

    /// 202 with the management links, `Location` = status query URL, `Retry-After: 10`.
    ///
    /// # Errors
    /// `ApiError::Configuration` when no notification URL is configured.
    pub fn create_check_status_response(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        attributes: &RoutingAttributes,
    ) -> Result<ApiResponse, ApiError> {
        let routing = routing_for(ctx, attributes);
        let links = self.links.build_links(
            ctx.url.as_ref(),
            instance_id,
            routing.task_hub.as_deref(),
            routing.connection.as_deref(),
        )?;

        let response = json_response(StatusCode::ACCEPTED, &links);
        let response = with_location(response, &links.status_query_get_uri);
        Ok(with_retry_after(response, CHECK_STATUS_RETRY_AFTER))
    }

    /// Management links for `instance_id` outside of any request.
    pub fn create_management_payload(
        &self,
        instance_id: &str,
        attributes: &RoutingAttributes,
    ) -> Result<ManagementLinks, ApiError> {
        self.links.build_links(
            None,
            instance_id,
            attributes.task_hub.as_deref(),
            attributes.connection.as_deref(),
        )
    }

    async fn require_instance(&self, instance_id: &str) -> Result<StatusSnapshot, ApiError> {
        self.client
            .get_status(instance_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(instance_id.to_string()))
    }
}

/// Query parameters win over caller-declared attributes.
fn routing_for(ctx: &RequestContext, attributes: &RoutingAttributes) -> RoutingAttributes {
    RoutingAttributes::new(
        ctx.query.get_non_empty(TASK_HUB).map(str::to_string),
        ctx.query.get_non_empty(CONNECTION).map(str::to_string),
    )
    .or(attributes)
}

/// Terminal-state gate shared by the mutating operations.
fn ensure_applicable(
    snapshot: &StatusSnapshot,
    operation: &'static str,
    blocked: impl Fn(RuntimeStatus) -> bool,
) -> Result<(), ApiError> {
    let status = snapshot.runtime_status;
    if status == RuntimeStatus::Unknown {
        return Err(ApiError::UnknownState {
            instance_id: snapshot.instance_id.clone(),
        });
    }
    if blocked(status) {
        return Err(ApiError::Gone {
            instance_id: snapshot.instance_id.clone(),
            status,
            operation,
        });
    }
    Ok(())
}

fn failure_response(error: ApiError) -> ApiResponse {
    if error.status_code().is_server_error() {
        error!(error = %error, "request failed");
    } else {
        info!(error = %error, "request rejected");
    }
    error_response(&error)
}

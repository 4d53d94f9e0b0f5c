//! HttpApiBuilder - ハンドラの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - OrchestrationClient が未設定なら build() 時に BuildError を返す
//! - config / clock は省略可能（デフォルト設定と SystemClock）

use std::sync::Arc;

use super::handler::HttpApiHandler;
use crate::config::HttpApiConfig;
use crate::ports::{Clock, OrchestrationClient, SystemClock};

/// HttpApiBuilder は HttpApiHandler を構築
///
/// # 使用例
/// ```ignore
/// let handler = HttpApiBuilder::new()
///     .config(HttpApiConfig::from_env()?)
///     .client(Arc::new(my_client))
///     .build()?;
/// ```
pub struct HttpApiBuilder {
    config: HttpApiConfig,
    client: Option<Arc<dyn OrchestrationClient>>,
    clock: Option<Arc<dyn Clock>>,
}

/// BuildError はハンドラ構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No orchestration client was configured. Call `client(...)` before `build()`.")]
    MissingClient,
}

impl HttpApiBuilder {
    pub fn new() -> Self {
        Self {
            config: HttpApiConfig::default(),
            client: None,
            clock: None,
        }
    }

    pub fn config(mut self, config: HttpApiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client(mut self, client: Arc<dyn OrchestrationClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// 省略時は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<HttpApiHandler, BuildError> {
        let client = self.client.ok_or(BuildError::MissingClient)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        if self.config.notification_url.is_none() {
            tracing::warn!("notification url is not configured; check-status responses will fail");
        }
        Ok(HttpApiHandler::new(Arc::new(self.config), client, clock))
    }
}

impl Default for HttpApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Clock port - 時刻と待機の抽象化
//!
//! Completion Waiter は「今の時刻」と「一定時間待つ」の 2 つだけに依存します。
//! テストでは `ManualClock` に差し替えて、実時間を使わずに経過時間を再現します。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Clock は現在時刻と協調的な待機を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - `sleep` はロックを保持しない非ブロッキング待機であること
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

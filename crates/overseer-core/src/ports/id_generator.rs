//! InstanceIdGenerator port - インスタンス ID 生成の抽象化
//!
//! 呼び出し側が ID を指定しない場合、ランタイム側で ID を採番します。
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（時刻でソート可能、調整なしで分散生成可能）

use ulid::Ulid;

use crate::ports::Clock;

/// InstanceIdGenerator はインスタンス ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait InstanceIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// 生成した ID は小文字の 32 桁 hex（ハイフンなし）で返します。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> InstanceIdGenerator for UlidGenerator<C> {
    fn generate(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        format!("{:032x}", ulid.0)
    }
}

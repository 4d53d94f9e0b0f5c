//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! HTTP ファサードは外部ランタイムの実装を知らず、ここの trait だけに依存します。
//!
//! # 設計原則
//! - 状態の正本は外部ランタイム（このクレートはキャッシュしない）
//! - 時刻と待機は Clock 経由（テストで経過時間を再現できる）

pub mod clock;
pub mod id_generator;
pub mod orchestration_client;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, SystemClock};
pub use self::id_generator::{InstanceIdGenerator, UlidGenerator};
pub use self::orchestration_client::{ClientError, InstanceFilter, OrchestrationClient};

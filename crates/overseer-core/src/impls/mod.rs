//! Impls - ポートの実装
//!
//! 開発・テスト用の実装を提供します。
//!
//! # 実装
//! - **InMemoryOrchestrationClient**: OrchestrationClient の in-memory 実装
//! - **ManualClock**: Clock のテスト用実装（sleep で時刻が進む）
//!
//! 本番のランタイムクライアントは別クレートで実装する想定です。

pub mod inmem_client;
pub mod manual_clock;

pub use self::inmem_client::{InMemoryOrchestrationClient, RecordedCall};
pub use self::manual_clock::ManualClock;

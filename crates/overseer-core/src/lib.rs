//! overseer-core
//!
//! HTTP control plane for orchestration instances hosted by an external runtime.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（runtime status, snapshot, management links, errors）
//! - **ports**: 抽象化レイヤー（OrchestrationClient, Clock, InstanceIdGenerator）
//! - **app**: アプリケーションロジック（builder, router, handler, waiter, links, query, translator）
//! - **impls**: 実装（InMemoryOrchestrationClient, ManualClock など開発・テスト用）
//! - **config**: 通知 URL とデフォルトの task hub / connection

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;
pub mod config;

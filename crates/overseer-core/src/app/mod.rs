//! App - アプリケーション層
//!
//! ports を組み合わせて HTTP ファサードを実装します。
//!
//! # 主要コンポーネント
//! - **HttpApiBuilder**: ハンドラの構築とワイヤリング
//! - **HttpApiHandler**: ルーティングと各操作（一覧、単一ステータス、terminate、rewind、raise-event）
//! - **Route**: パス → 操作の振り分け
//! - **QueryParams**: 寛容なクエリ解析
//! - **LinkBuilder**: 管理用 URL の組み立て
//! - **StatusTranslation**: ランタイム状態 → HTTP 応答の形
//! - waiter: 完了待ち（wait_or_accept）

pub mod builder;
pub mod handler;
pub mod links;
pub mod query;
pub mod response;
pub mod router;
pub mod translator;
pub mod waiter;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, HttpApiBuilder};
pub use self::handler::HttpApiHandler;
pub use self::links::LinkBuilder;
pub use self::query::QueryParams;
pub use self::response::{ApiRequest, ApiResponse, RequestContext};
pub use self::router::Route;
pub use self::translator::StatusTranslation;

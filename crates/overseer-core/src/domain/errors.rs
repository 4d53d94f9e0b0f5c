//! Errors - エラー型と HTTP への分類
//!
//! # 分類
//! - Configuration: デプロイ設定ミス（リトライ無意味）
//! - NotFound / Gone / Validation: 呼び出し側の問題（4xx）
//! - UnknownState / Client: サーバ側の問題（5xx）
//!
//! どのエラーもリクエスト単位で閉じています。

use http::StatusCode;
use thiserror::Error;

use super::status::RuntimeStatus;
use crate::ports::ClientError;

/// Request-level error of the HTTP façade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The notification URL is not configured.
    #[error("notification url is not configured; webhook links cannot be built")]
    Configuration,

    #[error("no instance with id '{0}' was found")]
    NotFound(String),

    /// The instance is in a state where the operation no longer applies.
    #[error("instance '{instance_id}' is already {status}; {operation} is not applicable")]
    Gone {
        instance_id: String,
        status: RuntimeStatus,
        operation: &'static str,
    },

    #[error("{0}")]
    Validation(String),

    #[error("instance '{instance_id}' reported an unrecognized runtime status")]
    UnknownState { instance_id: String },

    #[error("orchestration client failed: {0}")]
    Client(#[from] ClientError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gone { .. } => StatusCode::GONE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownState { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::configuration(ApiError::Configuration, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::not_found(ApiError::NotFound("x".into()), StatusCode::NOT_FOUND)]
    #[case::gone(
        ApiError::Gone { instance_id: "x".into(), status: RuntimeStatus::Completed, operation: "terminate" },
        StatusCode::GONE
    )]
    #[case::validation(ApiError::validation("bad"), StatusCode::BAD_REQUEST)]
    #[case::unknown(ApiError::UnknownState { instance_id: "x".into() }, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::client(ApiError::Client(ClientError::Unavailable("down".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_to_http_status(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn gone_message_names_status_and_operation() {
        let error = ApiError::Gone {
            instance_id: "abc123".into(),
            status: RuntimeStatus::Terminated,
            operation: "rewind",
        };
        assert_eq!(
            error.to_string(),
            "instance 'abc123' is already Terminated; rewind is not applicable"
        );
    }
}

//! Status translator: runtime status -> HTTP response shape.
//!
//! | Status                             | Code | Location | Retry-After |
//! |------------------------------------|------|----------|-------------|
//! | Pending, Running, ContinuedAsNew   | 202  | yes      | 5s          |
//! | Failed                             | 500  | no       | no          |
//! | Canceled, Terminated, Completed    | 200  | no       | no          |
//! | Unknown                            | 500  | no       | no          |

use std::time::Duration;

use http::StatusCode;

use crate::domain::RuntimeStatus;

/// `Retry-After` sent with an in-progress single-status response.
pub const STATUS_RETRY_AFTER: Duration = Duration::from_secs(5);

/// `Retry-After` sent with a check-status (202 Accepted + links) response.
pub const CHECK_STATUS_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Response shape chosen for one runtime status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTranslation {
    pub code: StatusCode,
    /// Whether `Location` (= the request URI) should be set.
    pub location: bool,
    pub retry_after: Option<Duration>,
}

impl StatusTranslation {
    const fn plain(code: StatusCode) -> Self {
        Self {
            code,
            location: false,
            retry_after: None,
        }
    }

    pub fn for_status(status: RuntimeStatus) -> Self {
        match status {
            RuntimeStatus::Pending | RuntimeStatus::Running | RuntimeStatus::ContinuedAsNew => Self {
                code: StatusCode::ACCEPTED,
                location: true,
                retry_after: Some(STATUS_RETRY_AFTER),
            },
            RuntimeStatus::Failed => Self::plain(StatusCode::INTERNAL_SERVER_ERROR),
            RuntimeStatus::Canceled | RuntimeStatus::Terminated | RuntimeStatus::Completed => {
                Self::plain(StatusCode::OK)
            }
            RuntimeStatus::Unknown => {
                tracing::error!(status = %status, "unrecognized runtime status; responding 500");
                Self::plain(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

//! RuntimeStatus - オーケストレーションインスタンスの状態
//!
//! 状態遷移は外部ランタイムが所有します。このクレートは読むだけで、
//! 書き換えることはありません。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime status of an orchestration instance, as reported by the runtime.
///
/// State transitions (owned by the runtime):
/// - Pending -> Running -> Completed | Failed | Canceled | Terminated
/// - Running -> ContinuedAsNew -> Running
///
/// `Unknown` は将来ランタイムが新しい状態を追加したときの受け皿です。
/// 外部クライアントが知らない文字列をデシリアライズすると `Unknown` になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuntimeStatus {
    Pending,
    Running,
    ContinuedAsNew,
    Completed,
    Failed,
    Canceled,
    Terminated,
    #[serde(other)]
    Unknown,
}

impl RuntimeStatus {
    /// Every status the runtime is known to report.
    pub const KNOWN: [RuntimeStatus; 7] = [
        RuntimeStatus::Pending,
        RuntimeStatus::Running,
        RuntimeStatus::ContinuedAsNew,
        RuntimeStatus::Completed,
        RuntimeStatus::Failed,
        RuntimeStatus::Canceled,
        RuntimeStatus::Terminated,
    ];

    /// Is this a terminal state (no further execution)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RuntimeStatus::Completed
                | RuntimeStatus::Failed
                | RuntimeStatus::Canceled
                | RuntimeStatus::Terminated
        )
    }

    /// Can a rewind still be requested?
    ///
    /// Failed stays rewindable.
    pub fn is_rewindable(self) -> bool {
        !matches!(
            self,
            RuntimeStatus::Completed | RuntimeStatus::Canceled | RuntimeStatus::Terminated
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeStatus::Pending => "Pending",
            RuntimeStatus::Running => "Running",
            RuntimeStatus::ContinuedAsNew => "ContinuedAsNew",
            RuntimeStatus::Completed => "Completed",
            RuntimeStatus::Failed => "Failed",
            RuntimeStatus::Canceled => "Canceled",
            RuntimeStatus::Terminated => "Terminated",
            RuntimeStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token does not name a known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown runtime status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for RuntimeStatus {
    type Err = ParseStatusError;

    /// Case-insensitive; surrounding whitespace is ignored. `Unknown` is never parsed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        RuntimeStatus::KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseStatusError(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(RuntimeStatus::Pending, false)]
    #[case::running(RuntimeStatus::Running, false)]
    #[case::continued(RuntimeStatus::ContinuedAsNew, false)]
    #[case::completed(RuntimeStatus::Completed, true)]
    #[case::failed(RuntimeStatus::Failed, true)]
    #[case::canceled(RuntimeStatus::Canceled, true)]
    #[case::terminated(RuntimeStatus::Terminated, true)]
    #[case::unknown(RuntimeStatus::Unknown, false)]
    fn terminal_states(#[case] status: RuntimeStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn failed_is_terminal_but_rewindable() {
        assert!(RuntimeStatus::Failed.is_terminal());
        assert!(RuntimeStatus::Failed.is_rewindable());
        assert!(!RuntimeStatus::Completed.is_rewindable());
        assert!(!RuntimeStatus::Canceled.is_rewindable());
        assert!(!RuntimeStatus::Terminated.is_rewindable());
        assert!(RuntimeStatus::Running.is_rewindable());
    }

    #[rstest]
    #[case("Running", RuntimeStatus::Running)]
    #[case("running", RuntimeStatus::Running)]
    #[case(" COMPLETED ", RuntimeStatus::Completed)]
    #[case("continuedasnew", RuntimeStatus::ContinuedAsNew)]
    fn parses_case_insensitively(#[case] token: &str, #[case] expected: RuntimeStatus) {
        assert_eq!(token.parse::<RuntimeStatus>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("Unknown".parse::<RuntimeStatus>().is_err());
        assert!("Finished".parse::<RuntimeStatus>().is_err());
        assert!("".parse::<RuntimeStatus>().is_err());
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&RuntimeStatus::ContinuedAsNew).unwrap();
        assert_eq!(json, "\"ContinuedAsNew\"");
    }

    #[test]
    fn unrecognized_values_deserialize_to_unknown() {
        let status: RuntimeStatus = serde_json::from_str("\"Suspended\"").unwrap();
        assert_eq!(status, RuntimeStatus::Unknown);
    }
}

//! Query - クエリ文字列の型付きパース
//!
//! 不正な値はエラーにせず、黙ってデフォルトに落とします。
//! - bool が読めない → `false`
//! - 日時が読めない → 呼び出し側のデフォルト
//! - 知らない状態名 → 集合から除外
//!
//! キー名は大文字小文字を区別しません。

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::form_urlencoded;

use crate::domain::RuntimeStatus;

pub const TASK_HUB: &str = "taskHub";
pub const CONNECTION: &str = "connection";
pub const CREATED_TIME_FROM: &str = "createdTimeFrom";
pub const CREATED_TIME_TO: &str = "createdTimeTo";
pub const RUNTIME_STATUS: &str = "runtimeStatus";
pub const INSTANCE_ID_PREFIX: &str = "instanceIdPrefix";
pub const SHOW_HISTORY: &str = "showHistory";
pub const SHOW_HISTORY_OUTPUT: &str = "showHistoryOutput";
pub const SHOW_INPUT: &str = "showInput";
pub const REASON: &str = "reason";

/// Decoded query string (`a=1&b=2`), in original order with repeated keys kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// `query` is the raw string after `?` (without the `?`).
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Every value for `name`, in order.
    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty value for `name`.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn parse_date_time(&self, name: &str, default: DateTime<Utc>) -> DateTime<Utc> {
        self.parse_optional_date_time(name).unwrap_or(default)
    }

    /// `None` when absent or unparsable.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and `YYYY-MM-DD`.
    pub fn parse_optional_date_time(&self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(name)?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// `false` unless the value is `true` (case-insensitive).
    pub fn parse_bool(&self, name: &str) -> bool {
        self.parse_bool_or(name, false)
    }

    /// `default` when absent or not `true`/`false`.
    pub fn parse_bool_or(&self, name: &str, default: bool) -> bool {
        match self.get(name).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    /// Comma-separated tokens across all repetitions of `name`; unknown tokens are dropped.
    pub fn parse_status_set(&self, name: &str) -> BTreeSet<RuntimeStatus> {
        self.get_all(name)
            .flat_map(|value| value.split(','))
            .filter_map(|token| token.parse().ok())
            .collect()
    }
}

//! LinkBuilder - インスタンス管理用の Webhook URL を組み立てる
//!
//! # 組み立て手順
//! 1. authority（scheme + host + port）はリクエストから、無ければ通知 URL から
//! 2. 通知 URL の path（末尾 `/` を除去）+ `/instances/` + エンコード済み instance id
//! 3. `taskHub=...&connection=...` を付け、通知 URL 自身のクエリ（アクセスキー）をそのまま追加
//!
//! 同じ入力からは常に同じ URL が得られます（隠れた状態なし）。

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::config::HttpApiConfig;
use crate::domain::{ApiError, EVENT_NAME_PLACEHOLDER, ManagementLinks, REASON_PLACEHOLDER};

pub const INSTANCES_SEGMENT: &str = "instances";
pub const TERMINATE_OPERATION: &str = "terminate";
pub const REWIND_OPERATION: &str = "rewind";
pub const RAISE_EVENT_OPERATION: &str = "raiseEvent";

/// Characters left as-is when encoding ids and query values (RFC 3986 unreserved).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment or query value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    config: Arc<HttpApiConfig>,
}

impl LinkBuilder {
    pub fn new(config: Arc<HttpApiConfig>) -> Self {
        Self { config }
    }

    /// Build the management link set for `instance_id`.
    ///
    /// # Errors
    /// `ApiError::Configuration` when no notification URL is configured.
    pub fn build_links(
        &self,
        request_url: Option<&Url>,
        instance_id: &str,
        task_hub: Option<&str>,
        connection: Option<&str>,
    ) -> Result<ManagementLinks, ApiError> {
        let notification_url = self
            .config
            .notification_url
            .as_ref()
            .ok_or(ApiError::Configuration)?;

        let authority = request_url
            .unwrap_or(notification_url)
            .origin()
            .ascii_serialization();
        let base_path = notification_url.path().trim_end_matches('/');
        let instance_prefix = format!(
            "{authority}{base_path}/{INSTANCES_SEGMENT}/{}",
            encode_component(instance_id)
        );

        let mut suffix = format!(
            "taskHub={}&connection={}",
            encode_component(self.config.resolve_hub_name(task_hub)),
            encode_component(self.config.resolve_connection_name(connection)),
        );
        if let Some(key_query) = notification_url.query().filter(|q| !q.is_empty()) {
            suffix.push('&');
            suffix.push_str(key_query);
        }

        Ok(ManagementLinks {
            id: instance_id.to_string(),
            status_query_get_uri: format!("{instance_prefix}?{suffix}"),
            send_event_post_uri: format!(
                "{instance_prefix}/{RAISE_EVENT_OPERATION}/{EVENT_NAME_PLACEHOLDER}?{suffix}"
            ),
            terminate_post_uri: format!(
                "{instance_prefix}/{TERMINATE_OPERATION}?reason={REASON_PLACEHOLDER}&{suffix}"
            ),
            rewind_post_uri: format!(
                "{instance_prefix}/{REWIND_OPERATION}?reason={REASON_PLACEHOLDER}&{suffix}"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CONNECTION_NAME, DEFAULT_HUB_NAME};

    fn builder(config: HttpApiConfig) -> LinkBuilder {
        LinkBuilder::new(Arc::new(config))
    }

    fn configured() -> HttpApiConfig {
        HttpApiConfig::new()
            .with_notification_url("https://fn.example.com/runtime/webhooks/durabletask/?code=SECRET%3D%3D")
            .unwrap()
    }

    #[test]
    fn missing_notification_url_is_a_configuration_error() {
        let err = builder(HttpApiConfig::new())
            .build_links(None, "abc123", None, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration));
    }

    #[test]
    fn builds_all_four_links_from_configuration() {
        let links = builder(configured())
            .build_links(None, "abc123", None, None)
            .unwrap();

        let prefix = "https://fn.example.com/runtime/webhooks/durabletask/instances/abc123";
        let suffix = format!(
            "taskHub={DEFAULT_HUB_NAME}&connection={DEFAULT_CONNECTION_NAME}&code=SECRET%3D%3D"
        );
        assert_eq!(links.id, "abc123");
        assert_eq!(links.status_query_get_uri, format!("{prefix}?{suffix}"));
        assert_eq!(
            links.send_event_post_uri,
            format!("{prefix}/raiseEvent/{{eventName}}?{suffix}")
        );
        assert_eq!(
            links.terminate_post_uri,
            format!("{prefix}/terminate?reason={{text}}&{suffix}")
        );
        assert_eq!(
            links.rewind_post_uri,
            format!("{prefix}/rewind?reason={{text}}&{suffix}")
        );
    }

    #[test]
    fn request_authority_wins_over_configured_one() {
        let request = Url::parse("http://localhost:7071/api/start?x=1").unwrap();
        let links = builder(configured())
            .build_links(Some(&request), "abc123", None, None)
            .unwrap();
        assert!(links.status_query_get_uri.starts_with(
            "http://localhost:7071/runtime/webhooks/durabletask/instances/abc123?"
        ));
    }

    #[test]
    fn overrides_and_instance_id_are_encoded() {
        let config = configured().with_hub_name("ConfiguredHub");
        let links = builder(config)
            .build_links(None, "order 7/b", Some("My Hub"), Some("conn&more"))
            .unwrap();
        assert_eq!(
            links.status_query_get_uri,
            "https://fn.example.com/runtime/webhooks/durabletask/instances/order%207%2Fb\
             ?taskHub=My%20Hub&connection=conn%26more&code=SECRET%3D%3D"
        );
    }

    #[test]
    fn configured_hub_used_without_override() {
        let config = configured().with_hub_name("ConfiguredHub").with_connection_name("Conn");
        let links = builder(config).build_links(None, "a", None, None).unwrap();
        assert!(links.status_query_get_uri.contains("taskHub=ConfiguredHub&connection=Conn&"));
    }

    #[test]
    fn no_key_query_means_no_trailing_separator() {
        let config = HttpApiConfig::new()
            .with_notification_url("http://localhost:7071/runtime/webhooks/durabletask")
            .unwrap();
        let links = builder(config).build_links(None, "a", None, None).unwrap();
        assert!(links.status_query_get_uri.ends_with(&format!(
            "?taskHub={DEFAULT_HUB_NAME}&connection={DEFAULT_CONNECTION_NAME}"
        )));
    }

    #[test]
    fn links_are_deterministic_and_share_prefix_and_suffix() {
        let builder = builder(configured());
        let first = builder.build_links(None, "abc123", Some("Hub"), None).unwrap();
        let second = builder.build_links(None, "abc123", Some("Hub"), None).unwrap();
        assert_eq!(first, second);

        let (prefix, suffix) = first.status_query_get_uri.split_once('?').unwrap();
        for link in [
            &first.send_event_post_uri,
            &first.terminate_post_uri,
            &first.rewind_post_uri,
        ] {
            assert!(link.starts_with(prefix));
            assert!(link.ends_with(suffix));
        }
    }
}

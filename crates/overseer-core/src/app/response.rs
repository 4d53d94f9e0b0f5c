//! HTTP request/response plumbing at the façade boundary.
//!
//! The façade speaks plain `http` types with buffered bodies so any host
//! (axum, hyper, a test) can adapt to it.

use std::time::Duration;

use http::header::{CONTENT_TYPE, HOST, LOCATION, RETRY_AFTER};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use serde::Serialize;
use url::Url;

use super::query::QueryParams;
use crate::domain::ApiError;

pub type ApiRequest = Request<Vec<u8>>;
pub type ApiResponse = Response<Vec<u8>>;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Everything a handler needs from the inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Absolute request URL when the authority is known (absolute URI or `Host` header).
    pub url: Option<Url>,
    /// Request URI as received.
    pub raw_uri: String,
    pub path: String,
    pub query: QueryParams,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RequestContext {
    /// Relative URIs are completed as `http://{Host}`.
    pub fn from_request(request: ApiRequest) -> Self {
        Self::from_request_with_scheme(request, "http")
    }

    /// Relative URIs (what hyper hands over, TLS or not) are completed as
    /// `{default_scheme}://{Host}`.
    pub fn from_request_with_scheme(request: ApiRequest, default_scheme: &str) -> Self {
        let (parts, body) = request.into_parts();
        let uri = &parts.uri;

        let url = match (uri.scheme_str(), uri.authority()) {
            (Some(_), Some(_)) => Url::parse(&uri.to_string()).ok(),
            _ => parts
                .headers
                .get(HOST)
                .and_then(|host| host.to_str().ok())
                .and_then(|host| {
                    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
                    Url::parse(&format!("{default_scheme}://{host}{path_and_query}")).ok()
                }),
        };

        Self {
            method: parts.method.clone(),
            raw_uri: uri.to_string(),
            path: uri.path().to_string(),
            query: QueryParams::parse(uri.query()),
            content_type: parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            url,
            body,
        }
    }

    /// The request URI as an absolute URL if possible, for `Location`.
    pub fn location(&self) -> String {
        self.url
            .as_ref()
            .map_or_else(|| self.raw_uri.clone(), Url::to_string)
    }

    /// Media type of the body without parameters, lower-cased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|media| media.trim().to_ascii_lowercase())
            .filter(|media| !media.is_empty())
    }
}

pub fn empty_response(status: StatusCode) -> ApiResponse {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> ApiResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(bytes);
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

pub fn error_response(error: &ApiError) -> ApiResponse {
    let message = error.to_string();
    json_response(error.status_code(), &ErrorBody { message: &message })
}

pub fn with_location(mut response: ApiResponse, location: &str) -> ApiResponse {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(LOCATION, value);
        }
        Err(_) => tracing::warn!(location, "location is not a valid header value; omitted"),
    }
    response
}

/// `Retry-After` in whole seconds.
pub fn with_retry_after(mut response: ApiResponse, after: Duration) -> ApiResponse {
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(after.as_secs()));
    response
}

//! Router - リクエストパスを操作に振り分ける
//!
//! パスを `/` で分割し、最初の `instances` セグメント以降を
//! {method, セグメント数, リテラル} のマッチャーテーブルで照合します。
//!
//! ```text
//! GET  .../instances                          -> ListStatus
//! GET  .../instances/{id}                     -> Status
//! POST .../instances/{id}/terminate           -> Terminate
//! POST .../instances/{id}/rewind              -> Rewind
//! POST .../instances/{id}/raiseEvent/{event}  -> RaiseEvent
//! ```
//!
//! リテラルは大文字小文字を区別しません。パラメータはパーセントデコードされます。

use http::Method;
use percent_encoding::percent_decode_str;

use super::links::{INSTANCES_SEGMENT, RAISE_EVENT_OPERATION, REWIND_OPERATION, TERMINATE_OPERATION};

/// Result of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListStatus,
    Status { instance_id: String },
    Terminate { instance_id: String },
    Rewind { instance_id: String },
    RaiseEvent { instance_id: String, event_name: String },
    /// Under `/instances/` but matches no operation (400).
    NoSuchApi,
    /// No `instances` segment, or a non-GET to the bare collection (404).
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
}

impl Verb {
    fn of(method: &Method) -> Option<Self> {
        if *method == Method::GET {
            Some(Verb::Get)
        } else if *method == Method::POST {
            Some(Verb::Post)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Param,
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Status,
    Terminate,
    Rewind,
    RaiseEvent,
}

struct Rule {
    verb: Verb,
    pattern: &'static [Token],
    operation: Operation,
}

/// Segments after `instances`. Matched in order; the first hit wins.
const RULES: &[Rule] = &[
    Rule {
        verb: Verb::Get,
        pattern: &[Token::Param],
        operation: Operation::Status,
    },
    Rule {
        verb: Verb::Post,
        pattern: &[Token::Param, Token::Literal(TERMINATE_OPERATION)],
        operation: Operation::Terminate,
    },
    Rule {
        verb: Verb::Post,
        pattern: &[Token::Param, Token::Literal(REWIND_OPERATION)],
        operation: Operation::Rewind,
    },
    Rule {
        verb: Verb::Post,
        pattern: &[Token::Param, Token::Literal(RAISE_EVENT_OPERATION), Token::Param],
        operation: Operation::RaiseEvent,
    },
];

impl Rule {
    /// Decoded parameters when `segments` fit this rule.
    fn capture(&self, verb: Verb, segments: &[&str]) -> Option<Vec<String>> {
        if self.verb != verb || self.pattern.len() != segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (token, segment) in self.pattern.iter().zip(segments) {
            match token {
                Token::Param => params.push(decode_segment(segment)),
                Token::Literal(literal) if literal.eq_ignore_ascii_case(segment) => {}
                Token::Literal(_) => return None,
            }
        }
        Some(params)
    }
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

impl Route {
    /// Route a request by method and URI path (no query string).
    pub fn resolve(method: &Method, path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(position) = segments
            .iter()
            .position(|segment| segment.eq_ignore_ascii_case(INSTANCES_SEGMENT))
        else {
            return Route::NotFound;
        };

        let verb = Verb::of(method);
        let rest = &segments[position + 1..];
        if rest.is_empty() {
            return match verb {
                Some(Verb::Get) => Route::ListStatus,
                _ => Route::NotFound,
            };
        }

        let Some(verb) = verb else {
            return Route::NoSuchApi;
        };
        RULES
            .iter()
            .find_map(|rule| {
                rule.capture(verb, rest)
                    .map(|params| Route::build(rule.operation, params))
            })
            .unwrap_or(Route::NoSuchApi)
    }

    fn build(operation: Operation, params: Vec<String>) -> Route {
        let mut params = params.into_iter();
        let instance_id = params.next().unwrap_or_default();
        match operation {
            Operation::Status => Route::Status { instance_id },
            Operation::Terminate => Route::Terminate { instance_id },
            Operation::Rewind => Route::Rewind { instance_id },
            Operation::RaiseEvent => Route::RaiseEvent {
                instance_id,
                event_name: params.next().unwrap_or_default(),
            },
        }
    }
}

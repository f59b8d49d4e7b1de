// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keypad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turning a trigger response into an [`ExecutionOutcome`].

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ExecutionError;

pub const HEADER_STATE: &str = "x-keys-state";
pub const HEADER_LOCKED: &str = "x-keys-locked";

pub const CONNECTIVITY_MESSAGE: &str = "Could not connect to server";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service Unavailable";
pub const UNRENDERABLE_BODY: &str = "<em>Response cannot be shown.</em>";

/// What the invoker read off the wire, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub state: Option<String>,
    pub locked: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), ..Self::default() }
    }

    pub fn with_content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = Some(value.into());
        self
    }

    pub fn with_state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn with_locked(mut self, value: impl Into<String>) -> Self {
        self.locked = Some(value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success { message: String, locked: bool, server_state: String },
    Failure { http_status: u16, message: String },
    ConnectivityError { message: String },
}

impl ExecutionOutcome {
    pub fn connectivity() -> Self {
        Self::ConnectivityError { message: CONNECTIVITY_MESSAGE.to_owned() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. }
            | Self::Failure { message, .. }
            | Self::ConnectivityError { message } => message,
        }
    }

    pub fn error(&self) -> Option<ExecutionError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { http_status, message } => {
                Some(ExecutionError::from_status(*http_status, message.clone()))
            }
            Self::ConnectivityError { .. } => Some(ExecutionError::Connectivity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub outcome: ExecutionOutcome,
    /// Reported back to the key regardless of outcome; empty unless the call succeeded.
    pub state_label: String,
    pub malformed: bool,
}

impl Classified {
    /// Like [`ExecutionOutcome::error`], but an unrenderable HTML body counts as
    /// [`ExecutionError::MalformedResponse`].
    pub fn error(&self) -> Option<ExecutionError> {
        if self.malformed {
            return Some(ExecutionError::MalformedResponse);
        }
        self.outcome.error()
    }
}

pub fn classify(response: RawResponse) -> Classified {
    if !response.is_success() {
        let message = if response.status == 503 {
            SERVICE_UNAVAILABLE_MESSAGE.to_owned()
        } else {
            response.body
        };
        return Classified {
            outcome: ExecutionOutcome::Failure { http_status: response.status, message },
            state_label: String::new(),
            malformed: false,
        };
    }

    let state_label = response.state.unwrap_or_default();
    let locked = parse_locked_flag(response.locked.as_deref());

    let (message, malformed) = if is_html(response.content_type.as_deref()) {
        match extract_body(&response.body) {
            Some(markup) => (markup, false),
            None => (UNRENDERABLE_BODY.to_owned(), true),
        }
    } else {
        (response.body, false)
    };

    Classified {
        outcome: ExecutionOutcome::Success {
            message,
            locked,
            server_state: state_label.clone(),
        },
        state_label,
        malformed,
    }
}

/// Permissive integer-prefix parse: `"1"`, `" 2px"` and `"-1"` lock; `"0"`, `"yes"`, absent
/// do not.
pub fn parse_locked_flag(raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let digits: &str = {
        let end = unsigned.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(unsigned.len());
        &unsigned[..end]
    };
    !digits.is_empty() && digits.bytes().any(|b| b != b'0')
}

pub fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
}

/// Inner markup of the document body, or `None` when a `<body` tag is never closed.
///
/// Documents without a `<body>` element are treated as body content once the doctype, the
/// `<html>` wrapper and any `<head>` section are removed.
pub fn extract_body(html: &str) -> Option<String> {
    static BODY_OPEN: OnceLock<Regex> = OnceLock::new();
    static BODY_CLOSE: OnceLock<Regex> = OnceLock::new();
    static BODY_UNCLOSED: OnceLock<Regex> = OnceLock::new();
    static PREAMBLE: OnceLock<Regex> = OnceLock::new();

    let body_open =
        BODY_OPEN.get_or_init(|| Regex::new(r"(?is)<body\b[^>]*>").expect("body open pattern"));
    let body_close =
        BODY_CLOSE.get_or_init(|| Regex::new(r"(?is)</body\s*>").expect("body close pattern"));

    if let Some(open) = body_open.find(html) {
        let rest = &html[open.end()..];
        let inner = match body_close.find(rest) {
            Some(close) => &rest[..close.start()],
            None => rest.trim_end().trim_end_matches("</html>"),
        };
        return Some(inner.trim().to_owned());
    }

    let body_unclosed = BODY_UNCLOSED
        .get_or_init(|| Regex::new(r"(?i)<body(?:[\s/]|$)").expect("unclosed body pattern"));
    if body_unclosed.is_match(html) {
        return None;
    }

    let preamble = PREAMBLE.get_or_init(|| {
        Regex::new(r"(?is)<!doctype[^>]*>|</?html\b[^>]*>|<head\b[^>]*>.*?</head\s*>")
            .expect("preamble pattern")
    });
    Some(preamble.replace_all(html, "").trim().to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        classify, extract_body, is_html, parse_locked_flag, ExecutionOutcome, RawResponse,
        SERVICE_UNAVAILABLE_MESSAGE, UNRENDERABLE_BODY,
    };
    use crate::error::ExecutionError;

    #[test]
    fn locked_success_carries_message_and_flag() {
        let classified = classify(RawResponse::new(200, "OK").with_locked("1"));
        assert_eq!(
            classified.outcome,
            ExecutionOutcome::Success {
                message: "OK".to_owned(),
                locked: true,
                server_state: String::new(),
            }
        );
        assert!(!classified.malformed);
    }

    #[test]
    fn state_header_becomes_label() {
        let classified =
            classify(RawResponse::new(200, "").with_state("on").with_content_type("text/plain"));
        assert_eq!(classified.state_label, "on");
        assert!(matches!(
            classified.outcome,
            ExecutionOutcome::Success { ref server_state, locked: false, .. }
                if server_state == "on"
        ));
    }

    #[test]
    fn service_unavailable_overrides_body() {
        let classified = classify(RawResponse::new(503, "backend exploded").with_state("ignored"));
        assert_eq!(
            classified.outcome,
            ExecutionOutcome::Failure {
                http_status: 503,
                message: SERVICE_UNAVAILABLE_MESSAGE.to_owned(),
            }
        );
        assert_eq!(classified.state_label, "");
    }

    #[test]
    fn other_failures_keep_body_verbatim() {
        let classified = classify(RawResponse::new(422, "Invalid key"));
        assert_eq!(
            classified.outcome,
            ExecutionOutcome::Failure { http_status: 422, message: "Invalid key".to_owned() }
        );
        assert_eq!(
            classified.outcome.error(),
            Some(ExecutionError::Client { status: 422, message: "Invalid key".to_owned() })
        );

        let classified = classify(RawResponse::new(500, "boom"));
        assert_eq!(classified.outcome.message(), "boom");
        assert!(matches!(
            classified.outcome.error(),
            Some(ExecutionError::Server { status: 500, .. })
        ));
    }

    #[test]
    fn failure_does_not_read_lock_header() {
        let classified = classify(RawResponse::new(422, "nope").with_locked("1"));
        assert!(!classified.outcome.is_success());
    }

    #[test]
    fn html_success_extracts_body_markup() {
        let response = RawResponse::new(
            200,
            "<!DOCTYPE html><html><head><title>x</title></head><body class=\"r\"><p>Hi</p></body></html>",
        )
        .with_content_type("text/html; charset=utf-8");
        let classified = classify(response);
        assert_eq!(classified.outcome.message(), "<p>Hi</p>");
    }

    #[test]
    fn unterminated_body_tag_degrades_to_placeholder() {
        let response =
            RawResponse::new(200, "<html><body class=\"x\"").with_content_type("text/html");
        let classified = classify(response);
        assert_eq!(classified.outcome.message(), UNRENDERABLE_BODY);
        assert!(classified.malformed);
        assert!(classified.outcome.is_success());
    }

    #[test]
    fn plain_text_is_not_parsed_as_html() {
        let classified =
            classify(RawResponse::new(200, "<b>raw</b>").with_content_type("text/plain"));
        assert_eq!(classified.outcome.message(), "<b>raw</b>");
    }

    #[test]
    fn fragment_without_body_is_its_own_body() {
        assert_eq!(extract_body("<p>fragment</p>").as_deref(), Some("<p>fragment</p>"));
        assert_eq!(
            extract_body("<html><head><style>p{}</style></head><p>x</p></html>").as_deref(),
            Some("<p>x</p>")
        );
        assert_eq!(extract_body("").as_deref(), Some(""));
    }

    #[test]
    fn elements_named_like_body_are_fragments() {
        assert_eq!(
            extract_body("<bodyguard>on duty</bodyguard>").as_deref(),
            Some("<bodyguard>on duty</bodyguard>")
        );
        let classified = classify(
            RawResponse::new(200, "<bodyguard>on duty</bodyguard>").with_content_type("text/html"),
        );
        assert_eq!(classified.outcome.message(), "<bodyguard>on duty</bodyguard>");
        assert!(!classified.malformed);
        assert_eq!(extract_body("<p>x</p><body").as_deref(), None);
    }

    #[test]
    fn unrenderable_html_reports_malformed_response() {
        let classified =
            classify(RawResponse::new(200, "<body class=\"x\"").with_content_type("text/html"));
        assert_eq!(classified.error(), Some(ExecutionError::MalformedResponse));
        assert_eq!(classified.outcome.error(), None);

        let rendered = classify(RawResponse::new(200, "<p>ok</p>").with_content_type("text/html"));
        assert_eq!(rendered.error(), None);

        let failed = classify(RawResponse::new(503, ""));
        assert!(matches!(failed.error(), Some(ExecutionError::Server { status: 503, .. })));
    }

    #[test]
    fn body_without_closing_tag_runs_to_end() {
        assert_eq!(extract_body("<body><p>open").as_deref(), Some("<p>open"));
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("0"), false)]
    #[case(Some("1"), true)]
    #[case(Some("2"), true)]
    #[case(Some("-1"), true)]
    #[case(Some(" 1"), true)]
    #[case(Some("1abc"), true)]
    #[case(Some("00"), false)]
    #[case(Some("true"), false)]
    #[case(Some(""), false)]
    #[case(Some("-"), false)]
    fn lock_header_parses_permissively(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_locked_flag(raw), expected);
    }

    #[rstest]
    #[case(Some("text/html"), true)]
    #[case(Some("Text/HTML; charset=utf-8"), true)]
    #[case(Some("text/plain"), false)]
    #[case(Some("application/xhtml+xml"), false)]
    #[case(None, false)]
    fn html_content_type_detection(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_html(value), expected);
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A message for the client to display, then hide after `dismiss_after_ms`.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>, dismiss_after_ms: u64) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            dismiss_after_ms,
        }
    }

    pub fn error(message: impl Into<String>, dismiss_after_ms: u64) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            dismiss_after_ms,
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl ApiErrorType {
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            context,
            notice: None,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

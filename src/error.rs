//! 统一错误处理
//!
//! 提供 `ApiError` 枚举实现 `IntoResponse`，所有 handler 返回 `ApiResult<T>`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::gateway::GatewayError;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// 命令原始输出（解析失败时回显，便于排查）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            raw_output: None,
        }
    }

    pub fn with_raw_output(mut self, raw_output: impl Into<String>) -> Self {
        self.raw_output = Some(raw_output.into());
        self
    }
}

/// 统一 API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 404 - 资源未找到 / 名称无效
    NotFound(String),
    /// 404 - 命令输出无法解析，附带原始输出
    UnexpectedOutput { message: String, raw_output: String },
    /// 400 - 请求无效
    BadRequest(String),
    /// 500 - 命令执行失败（stderr 原样返回）
    CommandFailed(String),
}

impl ApiError {
    /// 创建未找到错误
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 创建解析失败错误
    pub fn unexpected_output(message: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            message: message.into(),
            raw_output: raw_output.into(),
        }
    }

    /// 创建请求无效错误
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// 创建命令失败错误
    pub fn command_failed(stderr: impl Into<String>) -> Self {
        Self::CommandFailed(stderr.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::UnexpectedOutput { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CommandFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::NotFound(msg) => ErrorResponse::new("not_found", msg),
            ApiError::UnexpectedOutput {
                message,
                raw_output,
            } => ErrorResponse::new("unexpected_output", message).with_raw_output(raw_output),
            ApiError::BadRequest(msg) => ErrorResponse::new("bad_request", msg),
            ApiError::CommandFailed(stderr) => ErrorResponse::new("command_failed", stderr),
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(m) => write!(f, "Not found: {}", m),
            ApiError::UnexpectedOutput { message, .. } => write!(f, "Unexpected output: {}", message),
            ApiError::BadRequest(m) => write!(f, "Bad request: {}", m),
            ApiError::CommandFailed(m) => write!(f, "Command failed: {}", m),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidName(_) | GatewayError::NoRootTokens => {
                ApiError::not_found(err.to_string())
            }
            GatewayError::CommandFailed(stderr) => ApiError::command_failed(stderr),
            GatewayError::UnexpectedOutput {
                message,
                raw_output,
            } => ApiError::unexpected_output(message, raw_output),
        }
    }
}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_new() {
        let resp = ErrorResponse::new("test_error", "Test message");
        assert_eq!(resp.error, "test_error");
        assert_eq!(resp.message, "Test message");
        assert!(resp.raw_output.is_none());
    }

    #[test]
    fn test_error_response_skips_missing_raw_output() {
        let json = serde_json::to_value(ErrorResponse::new("e", "m")).unwrap();
        assert!(json.get("raw_output").is_none());

        let json = serde_json::to_value(ErrorResponse::new("e", "m").with_raw_output("oops")).unwrap();
        assert_eq!(json["raw_output"], "oops");
    }

    #[test]
    fn test_gateway_error_status_mapping() {
        let cases = [
            (GatewayError::InvalidName("a b".into()), StatusCode::NOT_FOUND),
            (GatewayError::NoRootTokens, StatusCode::NOT_FOUND),
            (
                GatewayError::CommandFailed("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GatewayError::UnexpectedOutput {
                    message: "bad".into(),
                    raw_output: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_command_failed_keeps_stderr_verbatim() {
        let err = ApiError::from(GatewayError::CommandFailed("no such container".into()));
        match err {
            ApiError::CommandFailed(msg) => assert_eq!(msg, "no such container"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}

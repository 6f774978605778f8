//! EdgeX 凭据相关模型

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// `secrets-config proxy adduser` 未返回用户名时的占位值
pub const MISSING_USERNAME: &str = "N/A";
/// 未返回密码时的占位值
pub const MISSING_PASSWORD: &str = "No password found";

/// EdgeX proxy 用户凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgexCredential {
    pub username: String,
    pub password: String,
}

/// adduser 输出解析错误
#[derive(Debug, Error)]
pub enum CredentialParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
}

impl EdgexCredential {
    /// 解析 adduser 的 JSON 输出
    ///
    /// 只接受 JSON 对象。字段缺失时使用占位值，非字符串值按 JSON 文本返回
    pub fn parse(output: &str) -> Result<Self, CredentialParseError> {
        let Value::Object(fields) = serde_json::from_str::<Value>(output)? else {
            return Err(CredentialParseError::NotAnObject);
        };

        Ok(Self {
            username: field_or(fields.get("username"), MISSING_USERNAME),
            password: field_or(fields.get("password"), MISSING_PASSWORD),
        })
    }
}

fn field_or(value: Option<&Value>, missing: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => missing.to_string(),
    }
}

/// GET /generate-password 响应
#[derive(Debug, Serialize)]
pub struct PasswordResponse {
    pub message: String,
    pub password: String,
}

impl From<EdgexCredential> for PasswordResponse {
    fn from(credential: EdgexCredential) -> Self {
        Self {
            message: format!("User {} created successfully.", credential.username),
            password: credential.password,
        }
    }
}

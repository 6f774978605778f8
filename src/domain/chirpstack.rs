//! ChirpStack API Key 相关模型

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 未替换的路由占位符，视为无效名称
const NAME_PLACEHOLDER: &str = "{name}";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid api key name regex"))
}

/// 经过校验的 API Key 名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyName(String);

impl ApiKeyName {
    /// 校验名称：非空、不是占位符、只包含 `[a-zA-Z0-9_-]`
    pub fn parse(name: &str) -> Option<Self> {
        if name.trim().is_empty() || name == NAME_PLACEHOLDER {
            return None;
        }
        if !name_pattern().is_match(name) {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiKeyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `chirpstack create-api-key` 输出中的 id / token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChirpstackApiKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ChirpstackApiKey {
    /// 逐行扫描 `id:` / `token:` 前缀
    ///
    /// 取前缀最后一次出现之后的内容；同一前缀出现多次时以最后一行为准。
    /// 两者都没有时返回 `None`
    pub fn parse(output: &str) -> Option<Self> {
        let mut key = Self::default();

        for line in output.lines() {
            if line.starts_with("id:") {
                key.id = Some(value_after(line, "id:"));
            } else if line.starts_with("token:") {
                key.token = Some(value_after(line, "token:"));
            }
        }

        if key.id.is_none() && key.token.is_none() {
            None
        } else {
            Some(key)
        }
    }
}

fn value_after(line: &str, prefix: &str) -> String {
    line.rsplit(prefix).next().unwrap_or_default().trim().to_string()
}

/// GET /create-chirpstack-api-key 响应
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub name: String,
    pub result: ChirpstackApiKey,
}

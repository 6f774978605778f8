//! Vault root token 提取

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn root_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""root_token"\s*:\s*"([^"]+)""#).expect("valid root token regex")
    })
}

/// 从 Vault init 响应文本中提取所有 root_token
///
/// 不要求 JSON 格式正确；按出现顺序返回，保留重复项
pub fn extract_root_tokens(raw: &str) -> Vec<String> {
    root_token_pattern()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// GET /tokens 响应
#[derive(Debug, Serialize)]
pub struct RootTokensResponse {
    pub tokens: Vec<String>,
}

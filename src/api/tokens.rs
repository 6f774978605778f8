//! Vault root token API

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::domain::RootTokensResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tokens", get(get_tokens))
}

/// 读取 Vault init 文件中的 root token
///
/// GET /tokens
async fn get_tokens(State(state): State<Arc<AppState>>) -> ApiResult<Json<RootTokensResponse>> {
    let tokens = state.gateway.list_root_tokens().await?;
    Ok(Json(RootTokensResponse { tokens }))
}

//! EdgeX 凭据 API
//!
//! 包含 /generate-password 端点

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::PasswordResponse;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 旧版查询参数
#[derive(Debug, Deserialize)]
pub struct GeneratePasswordQuery {
    pub username: Option<String>,
}

/// 创建 EdgeX 路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-password", get(generate_password_query))
        .route("/generate-password/:username", get(generate_password))
}

/// 为 EdgeX proxy 创建用户并返回密码
///
/// GET /generate-password/:username
async fn generate_password(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> ApiResult<Json<PasswordResponse>> {
    let credential = state.gateway.generate_credential(&username).await?;
    Ok(Json(credential.into()))
}

/// GET /generate-password?username=
async fn generate_password_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeneratePasswordQuery>,
) -> ApiResult<Json<PasswordResponse>> {
    let username = query
        .username
        .ok_or_else(|| ApiError::bad_request("Missing query parameter 'username'"))?;
    generate_password(State(state), Path(username)).await
}

//! ChirpStack API Key 管理
//!
//! 包含 /create-chirpstack-api-key 端点

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::ApiKeyResponse;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 旧版查询参数
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyQuery {
    pub name: Option<String>,
}

/// 创建 ChirpStack 路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-chirpstack-api-key", get(create_api_key_query))
        .route("/create-chirpstack-api-key/:name", get(create_api_key))
}

/// 创建 ChirpStack API Key
///
/// GET /create-chirpstack-api-key/:name
/// 名称不合法时返回 404，不执行命令
async fn create_api_key(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiKeyResponse>> {
    let result = state.gateway.create_api_key(&name).await?;
    Ok(Json(ApiKeyResponse { name, result }))
}

/// GET /create-chirpstack-api-key?name=
async fn create_api_key_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateApiKeyQuery>,
) -> ApiResult<Json<ApiKeyResponse>> {
    let name = query
        .name
        .ok_or_else(|| ApiError::bad_request("Missing query parameter 'name'"))?;
    create_api_key(State(state), Path(name)).await
}

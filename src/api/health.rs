//! 首页与健康检查 API
//!
//! 包含 /, /health 端点

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::env::constants::{SERVICE_NAME, VERSION};
use crate::domain::ContainerRegistry;
use crate::state::AppState;

/// 首页欢迎语
pub const WELCOME_MESSAGE: &str = "Welcome to the ChirpStack, EdgeX, and Root Token Manager!";

/// 首页响应
#[derive(Debug, Serialize)]
struct HomeResponse {
    message: &'static str,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_secs: i64,
    containers: ContainerRegistry,
    exec_mode: &'static str,
}

/// 创建首页和健康检查路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
}

/// GET /
async fn home() -> impl IntoResponse {
    Json(HomeResponse {
        message: WELCOME_MESSAGE,
    })
}

/// 健康检查 - 不执行任何命令
///
/// GET /health
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: VERSION,
        timestamp: now.to_rfc3339(),
        uptime_secs: (now - state.started_at).num_seconds(),
        containers: state.gateway.registry().clone(),
        exec_mode: state.config.exec.mode.as_str(),
    })
}

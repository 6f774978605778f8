//! IoT Admin Gateway - EdgeX / ChirpStack / Vault 管理命令网关
//!
//! 将 HTTP 请求转换为 `docker exec` 命令并解析其输出

pub mod error;
pub mod infra;
pub mod domain;
pub mod config;
pub mod state;
pub mod api;
pub mod services;

use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{EnvConfig, LogConfig};
use crate::state::{get_shutdown_token, AppState};

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub host_override: Option<IpAddr>,
    pub port_override: Option<u16>,
}

/// 初始化 tracing，`RUST_LOG` 优先于 `LOG_LEVEL`
pub fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// 加载配置并运行 HTTP 服务，直到收到 shutdown 信号
pub async fn run_with_config(runtime: RuntimeConfig) -> anyhow::Result<()> {
    let mut config = EnvConfig::from_env();
    init_tracing(&config.log);

    if let Some(host) = runtime.host_override {
        config.host = host;
    }
    if let Some(port) = runtime.port_override {
        config.port = port;
    }

    let addr = SocketAddr::new(config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = api::router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!(addr = %addr, version = crate::config::env::constants::VERSION, "Gateway listening");

    let shutdown = get_shutdown_token();
    tokio::spawn(wait_for_signal());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("server error")?;

    info!("Gateway stopped");
    Ok(())
}

/// 等待 Ctrl-C / SIGTERM 后触发全局 shutdown
async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, stopping server");
    state::trigger_shutdown();
}

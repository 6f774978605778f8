//! 应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::env::EnvConfig;
use crate::infra::{CommandExecutor, ProcessExecutor};
use crate::services::CommandGateway;

/// 全局 shutdown token，用于优雅关闭 HTTP 服务
static GLOBAL_SHUTDOWN: std::sync::OnceLock<CancellationToken> = std::sync::OnceLock::new();

/// 获取全局 shutdown token
pub fn get_shutdown_token() -> CancellationToken {
    GLOBAL_SHUTDOWN
        .get_or_init(CancellationToken::new)
        .clone()
}

/// 触发全局 shutdown
pub fn trigger_shutdown() {
    if let Some(token) = GLOBAL_SHUTDOWN.get() {
        token.cancel();
    }
}

/// 应用状态（只读，请求之间不共享可变数据）
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// 命令网关
    pub gateway: CommandGateway,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 使用 `ProcessExecutor` 创建应用状态
    pub fn new(config: EnvConfig) -> Self {
        let executor = ProcessExecutor::new(config.exec.mode)
            .with_timeout(config.exec.timeout)
            .with_max_concurrent(config.exec.max_concurrent);

        tracing::info!(
            host = %config.host,
            port = config.port,
            edgex = %config.registry.edgex,
            chirpstack = %config.registry.chirpstack,
            root = %config.registry.root,
            root_file = %config.registry.root_file_path,
            exec_mode = config.exec.mode.as_str(),
            timeout = ?config.exec.timeout,
            max_concurrent = config.exec.max_concurrent,
            "Loaded configuration"
        );

        Self::with_executor(config, Arc::new(executor))
    }

    /// 指定执行器创建应用状态
    pub fn with_executor(config: EnvConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        let gateway = CommandGateway::new(config.registry.clone(), executor);
        Self {
            config,
            gateway,
            started_at: Utc::now(),
        }
    }
}

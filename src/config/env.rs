//! 环境变量配置加载

use std::env;
use std::net::IpAddr;
use std::time::Duration;
use tracing::warn;

use crate::domain::ContainerRegistry;
use crate::infra::ExecMode;

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 监听地址
    pub host: IpAddr,
    /// 服务监听端口
    pub port: u16,
    /// 容器注册表
    pub registry: ContainerRegistry,
    /// 命令执行配置
    pub exec: ExecConfig,
    /// 日志配置
    pub log: LogConfig,
}

/// 命令执行配置
#[derive(Clone, Debug)]
pub struct ExecConfig {
    /// argv / shell
    pub mode: ExecMode,
    /// 单条命令超时，`None` 表示不限制
    pub timeout: Option<Duration>,
    /// 同时运行的子进程上限，0 表示不限制
    pub max_concurrent: usize,
}

/// 日志配置
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// `RUST_LOG` 未设置时使用的过滤级别
    pub level: String,
    /// 是否输出 JSON 日志
    pub json: bool,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let host = parse_or("HOST", IpAddr::from([0, 0, 0, 0]));
        let port = parse_or("PORT", 8000);

        Self {
            host,
            port,
            registry: registry_from_env(),
            exec: ExecConfig::from_env(),
            log: LogConfig::from_env(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            registry: ContainerRegistry::default(),
            exec: ExecConfig::default(),
            log: LogConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl ExecConfig {
    pub fn from_env() -> Self {
        let mode = match env::var("EXEC_MODE") {
            Ok(v) => ExecMode::from_str(&v).unwrap_or_else(|| {
                warn!(value = %v, "Unknown EXEC_MODE, falling back to argv");
                ExecMode::Argv
            }),
            Err(_) => ExecMode::Argv,
        };

        let timeout_secs: u64 = parse_or("COMMAND_TIMEOUT_SECS", constants::DEFAULT_COMMAND_TIMEOUT_SECS);
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let max_concurrent = parse_or("COMMAND_MAX_CONCURRENT", 0);

        Self {
            mode,
            timeout,
            max_concurrent,
        }
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            mode: ExecMode::Argv,
            timeout: Some(Duration::from_secs(constants::DEFAULT_COMMAND_TIMEOUT_SECS)),
            max_concurrent: 0,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let json = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self { level, json }
    }
}

/// 容器名可通过环境变量覆盖，空值视为未设置
fn registry_from_env() -> ContainerRegistry {
    let defaults = ContainerRegistry::default();
    ContainerRegistry {
        edgex: non_empty("EDGEX_CONTAINER").unwrap_or(defaults.edgex),
        chirpstack: non_empty("CHIRPSTACK_CONTAINER").unwrap_or(defaults.chirpstack),
        root: non_empty("ROOT_CONTAINER").unwrap_or(defaults.root),
        root_file_path: non_empty("ROOT_FILE_PATH").unwrap_or(defaults.root_file_path),
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// 解析环境变量，缺失或无效时使用默认值
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %v, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// 常量
pub mod constants {
    /// EdgeX adduser --tokenTTL
    pub const EDGEX_TOKEN_TTL: &str = "60";

    /// EdgeX adduser --jwtTTL
    pub const EDGEX_JWT_TTL: &str = "119m";

    /// ChirpStack 配置目录（容器内）
    pub const CHIRPSTACK_CONFIG_DIR: &str = "/etc/chirpstack";

    /// 默认命令超时（秒）
    pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300; // 5 分钟

    /// 服务名
    pub const SERVICE_NAME: &str = "iot-admin-gateway";

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

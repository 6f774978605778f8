//! 容器注册表
//!
//! 逻辑角色 -> 容器名映射，启动时注入，进程生命周期内只读

use serde::Serialize;

/// EdgeX proxy setup 容器
pub const DEFAULT_EDGEX_CONTAINER: &str = "edgex-security-proxy-setup";
/// ChirpStack 容器
pub const DEFAULT_CHIRPSTACK_CONTAINER: &str = "chirpstack-chirpstack-1";
/// Vault secretstore setup 容器（存放 root token 文件）
pub const DEFAULT_ROOT_CONTAINER: &str = "edgex-security-secretstore-setup";
/// Vault 初始化响应文件（容器内路径）
pub const DEFAULT_ROOT_FILE_PATH: &str = "/vault/config/assets/resp-init.json";

/// 容器注册表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRegistry {
    pub edgex: String,
    pub chirpstack: String,
    pub root: String,
    /// root token 文件路径，不出现在 health 输出中
    #[serde(skip)]
    pub root_file_path: String,
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self {
            edgex: DEFAULT_EDGEX_CONTAINER.to_string(),
            chirpstack: DEFAULT_CHIRPSTACK_CONTAINER.to_string(),
            root: DEFAULT_ROOT_CONTAINER.to_string(),
            root_file_path: DEFAULT_ROOT_FILE_PATH.to_string(),
        }
    }
}

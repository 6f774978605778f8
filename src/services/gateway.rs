//! Command Gateway
//!
//! 按固定模板拼装 `docker exec` 命令，执行后按接口解析输出：
//! - EdgeX: `secrets-config proxy adduser` → JSON 凭据
//! - ChirpStack: `create-api-key` → `id:` / `token:` 行
//! - Vault: `cat resp-init.json` → `root_token` 正则匹配

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::env::constants::{CHIRPSTACK_CONFIG_DIR, EDGEX_JWT_TTL, EDGEX_TOKEN_TTL};
use crate::domain::vault::extract_root_tokens;
use crate::domain::{ApiKeyName, ChirpstackApiKey, ContainerRegistry, EdgexCredential};
use crate::infra::{CommandArg, CommandExecutor, CommandResult, CommandSpec};

/// 网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// API Key 名称不合法（不会执行命令）
    #[error("Invalid API key name '{0}': only letters, digits, '_' and '-' are allowed")]
    InvalidName(String),

    /// 命令退出码非 0 或无法启动
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// 输出无法解析
    #[error("{message}")]
    UnexpectedOutput { message: String, raw_output: String },

    /// Vault 文件中没有 root_token
    #[error("No root tokens found.")]
    NoRootTokens,
}

/// Command Gateway
pub struct CommandGateway {
    registry: ContainerRegistry,
    executor: Arc<dyn CommandExecutor>,
}

impl CommandGateway {
    pub fn new(registry: ContainerRegistry, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// `docker exec <edgex> ./secrets-config proxy adduser --user <u> --tokenTTL 60 --jwtTTL 119m --useRootToken`
    pub fn adduser_command(&self, username: &str) -> CommandSpec {
        CommandSpec::docker_exec(&self.registry.edgex)
            .args(["./secrets-config", "proxy", "adduser", "--user"])
            .push(CommandArg::double_quoted(username))
            .args(["--tokenTTL", EDGEX_TOKEN_TTL, "--jwtTTL", EDGEX_JWT_TTL, "--useRootToken"])
    }

    /// `docker exec <chirpstack> chirpstack --config /etc/chirpstack create-api-key --name <n>`
    pub fn create_api_key_command(&self, name: &ApiKeyName) -> CommandSpec {
        CommandSpec::docker_exec(&self.registry.chirpstack)
            .args(["chirpstack", "--config", CHIRPSTACK_CONFIG_DIR, "create-api-key", "--name"])
            .push(CommandArg::single_quoted(name.as_str()))
    }

    /// `docker exec <root> cat <root file>`
    pub fn read_root_file_command(&self) -> CommandSpec {
        CommandSpec::docker_exec(&self.registry.root)
            .arg("cat")
            .arg(&self.registry.root_file_path)
    }

    async fn run(&self, operation: &'static str, spec: CommandSpec) -> Result<String, GatewayError> {
        match self.executor.execute(&spec).await {
            CommandResult::Output(stdout) => Ok(stdout),
            CommandResult::Error(stderr) => {
                error!(operation, command = %spec, error = %stderr, "Command failed");
                Err(GatewayError::CommandFailed(stderr))
            }
        }
    }

    /// 为 EdgeX proxy 创建用户并返回凭据
    pub async fn generate_credential(&self, username: &str) -> Result<EdgexCredential, GatewayError> {
        let output = self
            .run("generate_password", self.adduser_command(username))
            .await?;

        match EdgexCredential::parse(&output) {
            Ok(credential) => {
                info!(operation = "generate_password", username = %credential.username, "EdgeX user created");
                Ok(credential)
            }
            Err(e) => {
                warn!(operation = "generate_password", error = %e, raw_output = %output, "Unexpected EdgeX response");
                Err(GatewayError::UnexpectedOutput {
                    message: "Unexpected EdgeX response".to_string(),
                    raw_output: output,
                })
            }
        }
    }

    /// 创建 ChirpStack API Key
    ///
    /// 名称校验失败时直接返回，不执行任何命令
    pub async fn create_api_key(&self, name: &str) -> Result<ChirpstackApiKey, GatewayError> {
        let Some(name) = ApiKeyName::parse(name) else {
            warn!(operation = "create_api_key", name = %name, "Invalid API key name");
            return Err(GatewayError::InvalidName(name.to_string()));
        };

        let output = self
            .run("create_api_key", self.create_api_key_command(&name))
            .await?;

        match ChirpstackApiKey::parse(&output) {
            Some(key) => {
                info!(operation = "create_api_key", name = %name, id = ?key.id, "ChirpStack API key created");
                Ok(key)
            }
            None => {
                warn!(operation = "create_api_key", raw_output = %output, "Failed to parse ChirpStack API key");
                Err(GatewayError::UnexpectedOutput {
                    message: "Failed to parse ChirpStack API key".to_string(),
                    raw_output: output,
                })
            }
        }
    }

    /// 读取 Vault init 文件中的所有 root token
    pub async fn list_root_tokens(&self) -> Result<Vec<String>, GatewayError> {
        let output = self
            .run("get_tokens", self.read_root_file_command())
            .await?;

        let tokens = extract_root_tokens(&output);
        if tokens.is_empty() {
            warn!(operation = "get_tokens", "No root tokens found");
            return Err(GatewayError::NoRootTokens);
        }

        info!(operation = "get_tokens", count = tokens.len(), "Root tokens extracted");
        Ok(tokens)
    }
}

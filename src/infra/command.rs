//! 命令执行器
//!
//! 提供统一的命令执行接口，支持：
//! - argv 直接执行 / `sh -c` 字符串执行两种模式
//! - 超时控制（超时后 kill 子进程）
//! - 可选的并发子进程上限
//! - stdout/stderr 分离

use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// 执行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// 参数向量直接传给进程，不经过 shell
    #[default]
    Argv,
    /// 拼接成字符串交给 `sh -c`，参数不做转义
    Shell,
}

impl ExecMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "argv" | "exec" => Some(Self::Argv),
            "shell" | "sh" => Some(Self::Shell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecMode::Argv => "argv",
            ExecMode::Shell => "shell",
        }
    }
}

/// Shell 模式下参数的引号方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Double,
    Single,
}

/// 单个命令参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    value: String,
    quote: Quote,
}

impl CommandArg {
    /// 固定参数，shell 模式下原样拼接
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: Quote::None,
        }
    }

    /// 用户输入，shell 模式下包在双引号内（不转义）
    pub fn double_quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: Quote::Double,
        }
    }

    /// 用户输入，shell 模式下包在单引号内（不转义）
    pub fn single_quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: Quote::Single,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn render(&self) -> String {
        match self.quote {
            Quote::None => self.value.clone(),
            Quote::Double => format!("\"{}\"", self.value),
            Quote::Single => format!("'{}'", self.value),
        }
    }
}

/// 待执行的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<CommandArg>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `docker exec <container>`
    pub fn docker_exec(container: &str) -> Self {
        Self::new("docker").arg("exec").arg(container)
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(CommandArg::plain(value));
        self
    }

    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(values.into_iter().map(CommandArg::plain));
        self
    }

    pub fn push(mut self, arg: CommandArg) -> Self {
        self.args.push(arg);
        self
    }

    /// 参数向量（不含 program）
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(CommandArg::value).collect()
    }

    /// 渲染为 shell 命令字符串
    pub fn to_shell_string(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(CommandArg::render))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

/// 命令执行结果：stdout 或 stderr，二者只取其一，均已 trim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Output(String),
    Error(String),
}

impl CommandResult {
    /// 根据退出码选择 stdout / stderr
    pub fn from_output(output: &Output) -> Self {
        if output.status.success() {
            CommandResult::Output(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            CommandResult::Error(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResult::Output(_))
    }
}

/// 命令执行错误
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// 命令启动失败
    #[error("Failed to spawn command: {0}")]
    SpawnFailed(#[source] std::io::Error),
    /// 等待命令完成失败
    #[error("Failed to wait for command: {0}")]
    WaitFailed(#[source] std::io::Error),
    /// 命令超时
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),
    /// 并发限制器已关闭
    #[error("Command limiter closed")]
    LimiterClosed,
}

/// 执行原语
///
/// 网关只依赖这个 trait，测试中可以替换为记录调用的假实现
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> CommandResult;
}

/// 基于 `tokio::process` 的执行器
pub struct ProcessExecutor {
    mode: ExecMode,
    timeout: Option<Duration>,
    limiter: Option<Arc<Semaphore>>,
}

impl ProcessExecutor {
    pub fn new(mode: ExecMode) -> Self {
        Self {
            mode,
            timeout: None,
            limiter: None,
        }
    }

    /// 设置超时，`None` 表示一直等待
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// 限制同时运行的子进程数量，0 表示不限制
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.limiter = (max > 0).then(|| Arc::new(Semaphore::new(max)));
        self
    }

    fn build(&self, spec: &CommandSpec) -> Command {
        let mut cmd = match self.mode {
            ExecMode::Argv => {
                let mut cmd = Command::new(&spec.program);
                cmd.args(spec.argv());
                cmd
            }
            ExecMode::Shell => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(spec.to_shell_string());
                cmd
            }
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// 执行命令并收集输出
    pub async fn run(&self, spec: &CommandSpec) -> Result<Output, CommandError> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .acquire()
                    .await
                    .map_err(|_| CommandError::LimiterClosed)?,
            ),
            None => None,
        };

        debug!(mode = self.mode.as_str(), command = %spec, "Running command");

        let child = self
            .build(spec)
            .spawn()
            .map_err(CommandError::SpawnFailed)?;
        let output = child.wait_with_output();
        match self.timeout {
            // kill_on_drop: 超时丢弃 future 时子进程被 kill
            Some(timeout) => tokio::time::timeout(timeout, output)
                .await
                .map_err(|_| CommandError::Timeout(timeout))?
                .map_err(CommandError::WaitFailed),
            None => output.await.map_err(CommandError::WaitFailed),
        }
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> CommandResult {
        match self.run(spec).await {
            Ok(output) => {
                let result = CommandResult::from_output(&output);
                if !result.is_ok() {
                    warn!(program = %spec.program, status = ?output.status.code(), "Command exited with failure");
                }
                result
            }
            Err(e) => {
                error!(program = %spec.program, error = %e, "Command execution failed");
                CommandResult::Error(e.to_string())
            }
        }
    }
}

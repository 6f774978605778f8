//! IoT Admin Gateway
//!
//! Usage:
//! - Normal mode: `iot-admin-gateway`
//! - With custom port: `iot-admin-gateway --port 8001`
//! - Bind to localhost only: `iot-admin-gateway --host 127.0.0.1`

use clap::Parser;
use std::net::IpAddr;

use iot_admin_gateway::RuntimeConfig;

/// 命令行参数（未指定时使用环境变量 HOST / PORT）
#[derive(Parser)]
#[command(
    name = "iot-admin-gateway",
    version,
    about = "HTTP gateway for EdgeX, ChirpStack and Vault admin commands"
)]
struct Cli {
    /// Override the listening address
    #[arg(long)]
    host: Option<IpAddr>,

    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    iot_admin_gateway::run_with_config(RuntimeConfig {
        host_override: cli.host,
        port_override: cli.port,
    })
    .await
}

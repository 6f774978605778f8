//! 领域模型模块
//!
//! 纯数据结构与输出解析，不依赖 axum/tokio

pub mod registry;
pub mod edgex;
pub mod chirpstack;
pub mod vault;

// Re-exports for convenience
pub use registry::ContainerRegistry;
pub use edgex::{CredentialParseError, EdgexCredential, PasswordResponse};
pub use chirpstack::{ApiKeyName, ApiKeyResponse, ChirpstackApiKey};
pub use vault::RootTokensResponse;

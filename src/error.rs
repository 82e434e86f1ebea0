//! 错误类型

use std::time::Duration;
use thiserror::Error;

/// 远程 API 错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("GitHub authentication failed: {0}")]
    AuthFailed(String),

    #[error("GitHub rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// status 为 None 表示请求未得到响应（超时、连接失败）
    #[error("GitHub API error{}: {message}", status_hint(.status))]
    Remote { status: Option<u16>, message: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry in {}s", d.as_secs()),
        None => String::new(),
    }
}

fn status_hint(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

impl ApiError {
    pub fn timeout() -> Self {
        ApiError::Remote {
            status: None,
            message: "request timed out".to_string(),
        }
    }

    /// 认证失败不会因重试而恢复
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthFailed(_))
    }
}

/// 单个动作单元的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 浏览器或剪贴板调用失败
    #[error("{0}")]
    LocalIo(String),

    /// 前置条件不满足（内部处理，不作为失败上报）
    #[error("precondition unmet: {0}")]
    PreconditionUnmet(String),
}

/// 启动期致命错误
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("failed to read GitHub token: {0}")]
    Credential(String),

    #[error("invalid config file {path}: {reason}")]
    Config { path: String, reason: String },
}

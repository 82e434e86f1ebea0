//! 日志初始化
//!
//! 终端归 TUI 使用，日志写入 `~/.config/ghn/ghn.log`。

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// 默认过滤规则，可用 RUST_LOG 覆盖
pub const DEFAULT_FILTER: &str = "ghn=info";

pub fn init(log_path: &Path) -> Result<()> {
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

//! 命令行参数与配置文件
//!
//! 优先级：命令行 > 配置文件 `~/.config/ghn/config.json` > 默认值

use crate::api::DEFAULT_API_URL;
use crate::error::StartupError;
use crate::sync::MIN_INTERVAL;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 默认轮询间隔（秒）
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ghn")]
#[command(about = "Triage GitHub notifications with a tiny command language")]
#[command(version)]
pub struct Args {
    /// Show read and unread notifications (default)
    #[arg(long, conflicts_with = "unread_only")]
    pub all: bool,

    /// Show only unread notifications
    #[arg(long)]
    pub unread_only: bool,

    /// Poll interval in seconds (at least 1, fractions allowed)
    #[arg(long, value_name = "SECONDS", value_parser = parse_interval, allow_hyphen_values = true)]
    pub interval: Option<Duration>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// 解析轮询间隔：不小于 1 秒（允许小数）
pub fn parse_interval(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("interval must be positive, got {}", value));
    }
    let interval = Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())?;
    if interval < MIN_INTERVAL {
        return Err(format!(
            "interval must be at least {} second, got {}",
            MIN_INTERVAL.as_secs(),
            value
        ));
    }
    Ok(interval)
}

/// 配置文件内容（所有字段可选）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub interval_secs: Option<f64>,
    pub unread_only: Option<bool>,
}

/// 运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub include_read: bool,
    pub interval: Duration,
    pub api_url: String,
    pub request_timeout: Duration,
    pub log_path: PathBuf,
}

/// 应用目录 `~/.config/ghn`
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ghn")
}

impl Config {
    pub fn default_path() -> PathBuf {
        app_dir().join("config.json")
    }

    /// 合并命令行与配置文件
    pub fn from_args(args: &Args) -> Result<Self, StartupError> {
        let path = args.config.clone().unwrap_or_else(Self::default_path);
        let file = Self::load_file(&path)?;
        Self::resolve(args, file)
    }

    /// 读取配置文件；文件不存在时返回默认值
    pub fn load_file(path: &Path) -> Result<FileConfig, StartupError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file");
            return Ok(FileConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| StartupError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StartupError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, StartupError> {
        let include_read = if args.unread_only {
            false
        } else if args.all {
            true
        } else {
            !file.unread_only.unwrap_or(false)
        };

        let interval = match (args.interval, file.interval_secs) {
            (Some(interval), _) => interval,
            (None, Some(secs)) => parse_interval(&secs.to_string())
                .map_err(|e| StartupError::InvalidArgs(format!("interval_secs: {}", e)))?,
            (None, None) => Duration::from_secs(DEFAULT_INTERVAL_SECS),
        };

        let request_timeout = match file.request_timeout_secs {
            Some(0) => {
                return Err(StartupError::InvalidArgs(
                    "request_timeout_secs must be positive".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let api_url = file
            .api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            include_read,
            interval,
            api_url,
            request_timeout,
            log_path: app_dir().join("ghn.log"),
        })
    }
}

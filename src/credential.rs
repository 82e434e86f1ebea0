//! GitHub token 获取
//!
//! 读取优先级：
//! 1. 环境变量 `GITHUB_TOKEN`
//! 2. 环境变量 `GH_TOKEN`
//! 3. `gh auth token -h github.com`
//! 4. `gh auth token`

use crate::error::StartupError;
use std::process::Command;
use tracing::debug;

const ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// 获取 bearer token，失败为致命错误
pub fn load_token() -> Result<String, StartupError> {
    if let Some(token) = token_from_env(|name| std::env::var(name).ok()) {
        return Ok(token);
    }
    token_from_gh()
}

/// 从环境变量读取（注入 lookup 便于测试）
pub fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ENV_VARS.iter().find_map(|name| {
        let token = lookup(name)?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            debug!(source = *name, "Using GitHub token from environment");
            Some(token.to_string())
        }
    })
}

fn token_from_gh() -> Result<String, StartupError> {
    let gh = which::which("gh").map_err(|_| {
        StartupError::Credential(
            "no GITHUB_TOKEN set and the 'gh' CLI is not installed".to_string(),
        )
    })?;

    let mut last_error = String::new();
    for args in [&["auth", "token", "-h", "github.com"][..], &["auth", "token"][..]] {
        let output = Command::new(&gh)
            .args(args)
            .output()
            .map_err(|e| StartupError::Credential(format!("failed to run gh: {}", e)))?;

        if output.status.success() {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !token.is_empty() {
                debug!("Using GitHub token from gh CLI");
                return Ok(token);
            }
            last_error = "GitHub token was empty".to_string();
        } else {
            last_error = String::from_utf8_lossy(&output.stderr).trim().to_string();
        }
    }

    Err(StartupError::Credential(format!(
        "{} (run 'gh auth login')",
        last_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_precedence() {
        let token = token_from_env(|name| match name {
            "GITHUB_TOKEN" => Some(" ghp_first \n".to_string()),
            "GH_TOKEN" => Some("ghp_second".to_string()),
            _ => None,
        });
        assert_eq!(token.as_deref(), Some("ghp_first"));
    }

    #[test]
    fn test_blank_env_token_falls_through() {
        let token = token_from_env(|name| match name {
            "GITHUB_TOKEN" => Some("   ".to_string()),
            "GH_TOKEN" => Some("ghp_second".to_string()),
            _ => None,
        });
        assert_eq!(token.as_deref(), Some("ghp_second"));
    }

    #[test]
    fn test_no_env_token() {
        assert_eq!(token_from_env(|_| None), None);
    }
}

//! 工具函数

use chrono::{DateTime, Utc};

/// 相对时间（"15m"、"3d"）
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(timestamp).num_seconds();
    if seconds < 0 {
        return "0s".to_string();
    }
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// 去掉错误信息中重复的传输层前缀，状态栏只显示关键内容
pub fn clean_error_message(message: &str) -> String {
    const PREFIXES: [&str; 3] = [
        "GitHub API error: ",
        "error sending request for url ",
        "failed to fetch notifications: ",
    ];

    let mut text = message.trim();
    loop {
        let before = text;
        for prefix in PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest.trim_start();
            }
        }
        if before == text {
            break;
        }
    }

    // 只取第一行
    text.lines().next().unwrap_or("").to_string()
}

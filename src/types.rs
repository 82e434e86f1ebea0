//! 核心数据模型：通知线程与动作

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 解析后的命令集合：1-based 序号 -> 按输入顺序排列的动作
pub type CommandMap = BTreeMap<usize, Vec<Action>>;

/// 一条通知线程（一次同步结果中的一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationThread {
    /// 线程 ID，同一次同步结果内唯一
    pub id: String,
    /// 取消订阅所需的订阅资源地址，缺失时无法取消订阅
    pub subject_id: Option<String>,
    pub unread: bool,
    /// 通知原因（mention、review_requested、subscribed ...）
    pub reason: String,
    pub updated_at: DateTime<Utc>,
    pub subject: Subject,
    pub repository: Repository,
    /// 线程的规范地址
    pub url: String,
}

impl NotificationThread {
    /// 浏览器可打开的主题地址
    pub fn subject_url(&self) -> Option<&str> {
        self.subject.url.as_deref()
    }
}

/// 通知主题（PR、Issue、Discussion、Commit ...）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub title: String,
    pub url: Option<String>,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub visibility: Visibility,
}

/// 仓库可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// 命令语言中的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// 在浏览器中打开
    Open,
    /// 复制地址到剪贴板
    Yank,
    MarkRead,
    MarkDone,
    /// 取消订阅，随后标记完成
    Unsubscribe,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Open,
        Action::Yank,
        Action::MarkRead,
        Action::MarkDone,
        Action::Unsubscribe,
    ];

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'o' => Some(Self::Open),
            'y' => Some(Self::Yank),
            'r' => Some(Self::MarkRead),
            'd' => Some(Self::MarkDone),
            'q' => Some(Self::Unsubscribe),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Open => 'o',
            Self::Yank => 'y',
            Self::MarkRead => 'r',
            Self::MarkDone => 'd',
            Self::Unsubscribe => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Yank => "yank",
            Self::MarkRead => "read",
            Self::MarkDone => "done",
            Self::Unsubscribe => "unsubscribe",
        }
    }

    /// 是否需要主题地址才能执行
    pub fn needs_url(self) -> bool {
        matches!(self, Self::Open | Self::Yank)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

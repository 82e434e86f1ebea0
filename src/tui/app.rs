//! TUI 应用状态
//!
//! 状态变更都在这里完成，副作用（执行动作、刷新、退出）以 `Effect` 交给运行循环。

use super::event::Input;
use crate::command::CommandBuffer;
use crate::error::ApiError;
use crate::executor::ExecSummary;
use crate::sync::{NotificationStore, SyncEvent, SyncResult};
use crate::types::{CommandMap, NotificationThread};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// 状态栏级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// 状态栏消息
///
/// 非 sticky 消息在下一次成功刷新后清除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub sticky: bool,
}

impl StatusMessage {
    fn transient(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
            sticky: false,
        }
    }
}

/// 一次提交：命令与提交时的列表快照
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub commands: CommandMap,
    pub snapshot: Vec<NotificationThread>,
}

impl Submission {
    pub fn action_count(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }
}

/// 需要运行循环处理的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    Refresh,
    Execute(Submission),
}

pub struct App {
    pub store: NotificationStore,
    pub buffer: CommandBuffer,
    pub status: Option<StatusMessage>,
    /// 正在同步
    pub loading: bool,
    /// 正在执行的批次数
    pub running_batches: usize,
    pub include_read: bool,
    pub now: DateTime<Utc>,
    pub should_quit: bool,
}

impl App {
    pub fn new(include_read: bool) -> Self {
        Self {
            store: NotificationStore::new(),
            buffer: CommandBuffer::new(),
            status: None,
            loading: false,
            running_batches: 0,
            include_read,
            now: Utc::now(),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// 处理一次输入
    pub fn handle_input(&mut self, input: Input) -> Option<Effect> {
        let count = self.store.len();
        match input {
            Input::Char(ch) => {
                self.buffer.push_char(ch, count);
                None
            }
            Input::Backspace => {
                self.buffer.backspace(count);
                None
            }
            Input::Clear => {
                self.buffer.clear();
                None
            }
            Input::Submit => self.submit(),
            Input::Refresh => {
                self.status = Some(StatusMessage::transient("Refreshing..."));
                Some(Effect::Refresh)
            }
            Input::Quit => {
                self.quit();
                Some(Effect::Quit)
            }
        }
    }

    /// 提交缓冲区
    ///
    /// 按当前列表长度重新解析后清空缓冲区；命令在提交时的快照上执行。
    pub fn submit(&mut self) -> Option<Effect> {
        let commands = self.buffer.take(self.store.len());
        if commands.is_empty() {
            self.status = Some(StatusMessage::transient("No commands to run"));
            return None;
        }

        let submission = Submission {
            commands,
            snapshot: self.store.threads().to_vec(),
        };
        let total = submission.action_count();
        info!(actions = total, "Submitting commands");
        self.running_batches += 1;
        self.status = Some(StatusMessage::transient(format!(
            "Executing {} actions...",
            total
        )));
        Some(Effect::Execute(submission))
    }

    /// 批次执行结束，显示汇总并触发刷新
    pub fn on_batch_finished(&mut self, summary: ExecSummary) -> Effect {
        self.running_batches = self.running_batches.saturating_sub(1);
        let level = if summary.failed > 0 {
            StatusLevel::Error
        } else {
            StatusLevel::Info
        };
        self.status = Some(StatusMessage {
            text: summary.status_line(),
            level,
            sticky: true,
        });
        Effect::Refresh
    }

    pub fn on_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Started => self.loading = true,
            SyncEvent::Finished(result) => {
                self.loading = false;
                self.on_sync_result(result);
            }
        }
    }

    fn on_sync_result(&mut self, result: SyncResult) {
        match self.store.apply_sync(result) {
            Ok(replaced) => {
                if replaced {
                    self.buffer.reparse(self.store.len());
                }
                // 批次执行中保留进度提示
                if self.running_batches == 0 && self.status.as_ref().is_some_and(|s| !s.sticky) {
                    self.status = None;
                }
            }
            Err(err) => self.show_sync_error(&err),
        }
    }

    fn show_sync_error(&mut self, err: &ApiError) {
        warn!(error = %err, "Sync error shown");
        self.status = Some(if err.is_auth() {
            StatusMessage {
                text: format!("{} (check GITHUB_TOKEN or `gh auth login`)", err),
                level: StatusLevel::Error,
                sticky: true,
            }
        } else {
            StatusMessage {
                text: err.to_string(),
                level: StatusLevel::Warning,
                sticky: false,
            }
        });
    }

    /// 界面定时刷新，用于更新相对时间
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

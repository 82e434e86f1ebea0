//! 通知缓存：最近一次成功同步的完整列表

use super::engine::SyncResult;
use crate::error::ApiError;
use crate::types::NotificationThread;
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStore {
    threads: Vec<NotificationThread>,
    unread_count: usize,
    last_seq: Option<u64>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threads(&self) -> &[NotificationThread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// 按 1-based 显示序号取条目
    pub fn get(&self, index: usize) -> Option<&NotificationThread> {
        index.checked_sub(1).and_then(|i| self.threads.get(i))
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// 整体替换列表
    ///
    /// 序号不比上次新的结果被丢弃，返回是否替换。
    pub fn apply(&mut self, seq: u64, threads: Vec<NotificationThread>) -> bool {
        if self.last_seq.is_some_and(|last| seq <= last) {
            debug!(seq, last = ?self.last_seq, "Discarding stale sync result");
            return false;
        }

        self.unread_count = threads.iter().filter(|t| t.unread).count();
        self.threads = threads;
        self.last_seq = Some(seq);
        self.last_synced_at = Some(Utc::now());
        true
    }

    /// 应用一次同步结果
    ///
    /// `Unchanged` 不触碰缓存；失败原样返回给调用方展示。
    pub fn apply_sync(&mut self, result: SyncResult) -> Result<bool, ApiError> {
        match result {
            SyncResult::Refreshed { seq, threads } => Ok(self.apply(seq, threads)),
            SyncResult::Unchanged => Ok(false),
            SyncResult::Failed(err) => Err(err),
        }
    }
}

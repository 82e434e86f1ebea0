//! 远程通知 API 抽象

mod github;

pub use github::{html_url_from_api, GitHubClient, DEFAULT_API_URL};

use crate::error::ApiError;
use crate::types::NotificationThread;
use async_trait::async_trait;
use std::time::Duration;

/// 列表查询结果
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    pub body: ListBody,
    /// 服务端建议的下次轮询间隔
    pub poll_interval: Option<Duration>,
    /// 缓存校验值，下次查询时原样带回
    pub validator: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListBody {
    Changed(Vec<NotificationThread>),
    /// 服务端确认自上次以来没有变化
    Unchanged,
}

impl ListResponse {
    pub fn changed(threads: Vec<NotificationThread>) -> Self {
        Self {
            body: ListBody::Changed(threads),
            poll_interval: None,
            validator: None,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            body: ListBody::Unchanged,
            poll_interval: None,
            validator: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_validator(mut self, validator: impl Into<String>) -> Self {
        self.validator = Some(validator.into());
        self
    }
}

/// 远程协作方契约
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list_notifications(
        &self,
        include_read: bool,
        validator: Option<&str>,
    ) -> Result<ListResponse, ApiError>;

    async fn mark_read(&self, thread_id: &str) -> Result<(), ApiError>;

    async fn mark_done(&self, thread_id: &str) -> Result<(), ApiError>;

    async fn unsubscribe(&self, subject_id: &str) -> Result<(), ApiError>;
}

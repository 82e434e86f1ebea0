//! 集成测试共用的假实现与测试数据

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ghn::{
    ActionError, ApiError, ListResponse, NotificationApi, NotificationThread, Repository, Subject,
    SystemIntegration, Visibility,
};
use std::collections::HashSet;
use std::sync::Mutex;

pub fn thread(id: &str) -> NotificationThread {
    NotificationThread {
        id: id.to_string(),
        subject_id: Some(format!(
            "https://api.github.com/notifications/threads/{}/subscription",
            id
        )),
        unread: true,
        reason: "mention".to_string(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        subject: Subject {
            title: format!("Issue {}", id),
            url: Some(format!("https://github.com/acme/widgets/issues/{}", id)),
            kind: "Issue".to_string(),
        },
        repository: Repository {
            id: 7,
            name: "widgets".to_string(),
            full_name: "acme/widgets".to_string(),
            visibility: Visibility::Public,
        },
        url: format!("https://api.github.com/notifications/threads/{}", id),
    }
}

pub fn threads(count: usize) -> Vec<NotificationThread> {
    (1..=count).map(|i| thread(&format!("t{}", i))).collect()
}

/// 记录调用的假 API，可指定失败的调用
#[derive(Default)]
pub struct RecordingApi {
    pub calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 调用名形如 `mark_done:t1`、`unsubscribe:<url>`
    pub fn fail_on(self, call: &str) -> Self {
        self.failing.lock().unwrap().insert(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&call) {
            return Err(ApiError::Remote {
                status: Some(500),
                message: format!("{} exploded", call),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationApi for RecordingApi {
    async fn list_notifications(
        &self,
        _include_read: bool,
        _validator: Option<&str>,
    ) -> Result<ListResponse, ApiError> {
        Ok(ListResponse::unchanged())
    }

    async fn mark_read(&self, thread_id: &str) -> Result<(), ApiError> {
        self.record(format!("mark_read:{}", thread_id))
    }

    async fn mark_done(&self, thread_id: &str) -> Result<(), ApiError> {
        self.record(format!("mark_done:{}", thread_id))
    }

    async fn unsubscribe(&self, subject_id: &str) -> Result<(), ApiError> {
        self.record(format!("unsubscribe:{}", subject_id))
    }
}

/// 记录浏览器与剪贴板调用的假系统集成
#[derive(Default)]
pub struct RecordingSystem {
    pub opened: Mutex<Vec<String>>,
    pub copied: Mutex<Vec<String>>,
    pub fail_open: bool,
}

impl RecordingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        let mut opened = self.opened.lock().unwrap().clone();
        opened.sort();
        opened
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

#[async_trait]
impl SystemIntegration for RecordingSystem {
    async fn open_in_browser(&self, url: &str) -> Result<(), ActionError> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail_open {
            return Err(ActionError::LocalIo("xdg-open not found".to_string()));
        }
        Ok(())
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ActionError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

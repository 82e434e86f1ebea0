//! 批量动作执行器
//!
//! 每个 (序号, 动作) 调度为一个独立的并发单元，全部结束后汇总。
//! 单元之间互不取消，不做回滚。

use crate::api::NotificationApi;
use crate::error::ActionError;
use crate::system::SystemIntegration;
use crate::types::{Action, CommandMap, NotificationThread};
use crate::util::clean_error_message;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次提交的执行汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// 失败单元的错误信息（顺序无意义）
    pub errors: Vec<String>,
}

impl ExecSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// 状态栏文本
    pub fn status_line(&self) -> String {
        if self.failed == 0 {
            return format!("Executed {} actions", self.succeeded);
        }
        let first = self
            .errors
            .first()
            .map(String::as_str)
            .unwrap_or("unknown error");
        format!(
            "{} succeeded, {} failed: {}",
            self.succeeded, self.failed, first
        )
    }
}

/// 动作执行器
pub struct ActionExecutor {
    api: Arc<dyn NotificationApi>,
    system: Arc<dyn SystemIntegration>,
}

impl Clone for ActionExecutor {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            system: Arc::clone(&self.system),
        }
    }
}

impl ActionExecutor {
    pub fn new(api: Arc<dyn NotificationApi>, system: Arc<dyn SystemIntegration>) -> Self {
        Self { api, system }
    }

    /// 执行命令集合
    ///
    /// `notifications` 是提交时的列表快照；目标序号已不存在的条目被跳过且不计数。
    pub async fn execute(
        &self,
        commands: &CommandMap,
        notifications: &[NotificationThread],
    ) -> ExecSummary {
        let mut tasks = Vec::new();

        for (index, actions) in commands {
            let Some(thread) = index.checked_sub(1).and_then(|i| notifications.get(i)) else {
                debug!(index, "Target vanished before execution, skipping");
                continue;
            };
            let thread = Arc::new(thread.clone());

            for action in actions {
                let action = *action;
                if action.needs_url() && thread.subject_url().is_none() {
                    warn!(index, thread_id = %thread.id, action = %action, "Thread has no subject url, skipping");
                    continue;
                }

                let api = Arc::clone(&self.api);
                let system = Arc::clone(&self.system);
                let thread = Arc::clone(&thread);
                tasks.push(tokio::spawn(async move {
                    let result = run_unit(api.as_ref(), system.as_ref(), action, &thread).await;
                    (action, result)
                }));
            }
        }

        let mut summary = ExecSummary::default();
        for task in tasks {
            match task.await {
                Ok((_, Ok(()))) => summary.succeeded += 1,
                Ok((action, Err(err))) => {
                    warn!(action = %action, error = %err, "Action failed");
                    summary.failed += 1;
                    summary.errors.push(clean_error_message(&err.to_string()));
                }
                Err(err) => {
                    warn!(error = %err, "Action task panicked");
                    summary.failed += 1;
                    summary.errors.push(err.to_string());
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch finished"
        );
        summary
    }
}

async fn run_unit(
    api: &dyn NotificationApi,
    system: &dyn SystemIntegration,
    action: Action,
    thread: &NotificationThread,
) -> Result<(), ActionError> {
    let url = || {
        thread
            .subject_url()
            .ok_or_else(|| ActionError::PreconditionUnmet("subject url missing".to_string()))
    };

    match action {
        Action::Open => system.open_in_browser(url()?).await,
        Action::Yank => system.copy_to_clipboard(url()?).await,
        Action::MarkRead => Ok(api.mark_read(&thread.id).await?),
        Action::MarkDone => Ok(api.mark_done(&thread.id).await?),
        Action::Unsubscribe => {
            match thread.subject_id.as_deref() {
                Some(subject_id) => {
                    // 取消订阅失败不影响后续标记完成，单元结果只看 mark_done
                    if let Err(err) = api.unsubscribe(subject_id).await {
                        warn!(thread_id = %thread.id, error = %err, "Unsubscribe failed, still marking done");
                    }
                }
                None => {
                    debug!(thread_id = %thread.id, "No subject identity, skipping unsubscribe");
                }
            }
            Ok(api.mark_done(&thread.id).await?)
        }
    }
}

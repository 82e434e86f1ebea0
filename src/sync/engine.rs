//! 通知同步状态机
//!
//! `Idle -> Fetching -> {Refreshed | Unchanged | Failed} -> Idle`
//!
//! 引擎持有缓存校验值与轮询调度；拿到的列表交给 NotificationStore 整体替换。

use super::schedule::PollSchedule;
use crate::api::{ListBody, NotificationApi};
use crate::error::ApiError;
use crate::types::NotificationThread;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
}

/// 单次同步结果
#[derive(Debug, Clone, PartialEq)]
pub enum SyncResult {
    /// seq 单调递增，用于丢弃过期结果
    Refreshed {
        seq: u64,
        threads: Vec<NotificationThread>,
    },
    Unchanged,
    Failed(ApiError),
}

/// 最近一次同步结果的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Refreshed,
    Unchanged,
    Failed,
}

impl SyncResult {
    pub fn outcome(&self) -> SyncOutcome {
        match self {
            SyncResult::Refreshed { .. } => SyncOutcome::Refreshed,
            SyncResult::Unchanged => SyncOutcome::Unchanged,
            SyncResult::Failed(_) => SyncOutcome::Failed,
        }
    }
}

pub struct SyncEngine {
    api: Arc<dyn NotificationApi>,
    include_read: bool,
    validator: Option<String>,
    schedule: PollSchedule,
    phase: SyncPhase,
    seq: u64,
    last_outcome: Option<SyncOutcome>,
    /// 限流截止时间，之前的手动刷新并入已推迟的 tick
    rate_limited_until: Option<Instant>,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn NotificationApi>, include_read: bool, interval: Duration) -> Self {
        Self {
            api,
            include_read,
            validator: None,
            schedule: PollSchedule::new(interval, Instant::now()),
            phase: SyncPhase::Idle,
            seq: 0,
            last_outcome: None,
            rate_limited_until: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    pub fn interval(&self) -> Duration {
        self.schedule.interval()
    }

    pub fn validator(&self) -> Option<&str> {
        self.validator.as_deref()
    }

    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome
    }

    pub fn rate_limited_until(&self) -> Option<Instant> {
        self.rate_limited_until
    }

    /// 手动刷新请求
    ///
    /// 限流期内返回 false，刷新被合并到已推迟的 tick；否则下一次 tick 立即到期。
    pub fn request_refresh(&mut self, now: Instant) -> bool {
        if let Some(until) = self.rate_limited_until {
            if now < until {
                debug!(wait_secs = (until - now).as_secs(), "Refresh deferred by rate limit");
                return false;
            }
            self.rate_limited_until = None;
        }
        self.schedule.fire_now(now);
        true
    }

    /// 执行一次列表查询并更新同步状态
    ///
    /// 结束后从当前时间起重新调度下一次 tick。
    pub async fn fetch(&mut self) -> SyncResult {
        self.phase = SyncPhase::Fetching;
        debug!(validator = ?self.validator, "Sync fetching");

        let response = self
            .api
            .list_notifications(self.include_read, self.validator.as_deref())
            .await;
        let now = Instant::now();
        self.schedule.reschedule(now);

        let result = match response {
            Ok(response) => {
                self.rate_limited_until = None;
                if let Some(interval) = response.poll_interval {
                    if interval != self.schedule.interval() {
                        info!(
                            old_secs = self.schedule.interval().as_secs(),
                            new_secs = interval.as_secs(),
                            "Adopting server poll interval"
                        );
                        self.schedule.set_interval(interval);
                        self.schedule.reschedule(now);
                    }
                }
                if let Some(validator) = response.validator {
                    self.validator = Some(validator);
                }

                match response.body {
                    ListBody::Changed(threads) => {
                        self.seq += 1;
                        info!(seq = self.seq, count = threads.len(), "Sync refreshed");
                        SyncResult::Refreshed {
                            seq: self.seq,
                            threads,
                        }
                    }
                    ListBody::Unchanged => {
                        debug!("Sync unchanged");
                        SyncResult::Unchanged
                    }
                }
            }
            Err(err) => {
                if let ApiError::RateLimited {
                    retry_after: Some(wait),
                } = &err
                {
                    self.schedule.defer_at_least(now, *wait);
                    self.rate_limited_until = Some(now + *wait);
                }
                warn!(error = %err, "Sync failed");
                SyncResult::Failed(err)
            }
        };

        self.last_outcome = Some(result.outcome());
        self.phase = SyncPhase::Idle;
        result
    }
}

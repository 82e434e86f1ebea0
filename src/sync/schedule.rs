//! 轮询调度句柄
//!
//! 所有方法显式接收当前时间，测试可以用虚拟时钟驱动。
//! 重新调度总是从"现在"起算，挂起期间错过的 tick 被合并成一次。

use std::time::Duration;
use tokio::time::Instant;

/// 最小轮询间隔
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Instant,
}

impl PollSchedule {
    /// 创建调度，首次 tick 立即到期（初始加载）
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            next_due: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// 从 now 起算下一次 tick
    pub fn reschedule(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    /// 修改间隔，下一次 reschedule 生效
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_INTERVAL);
    }

    /// 下一次 tick 至少推迟到 now + wait（限流）
    pub fn defer_at_least(&mut self, now: Instant, wait: Duration) {
        let earliest = now + wait;
        if earliest > self.next_due {
            self.next_due = earliest;
        }
    }

    pub fn fire_now(&mut self, now: Instant) {
        self.next_due = now;
    }
}

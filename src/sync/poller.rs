//! 后台轮询任务
//!
//! 任务独占 SyncEngine，一次只跑一个 fetch；定时 tick 与手动刷新都会
//! 在 fetch 结束后从当前时间重新调度，不会排队补跑错过的 tick。

use super::engine::{SyncEngine, SyncResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// 发给 UI 的同步事件
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Started,
    Finished(SyncResult),
}

/// 轮询任务句柄，drop 时取消任务
pub struct PollerHandle {
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// 请求立即刷新；已有待处理的刷新时合并
    pub fn refresh(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// 启动轮询任务；首次 tick 立即执行
pub fn spawn_poller(mut engine: SyncEngine, events: mpsc::Sender<SyncEvent>) -> PollerHandle {
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        info!(interval_secs = engine.interval().as_secs(), "Poller started");
        loop {
            let due = engine.schedule().next_due();
            tokio::select! {
                _ = tokio::time::sleep_until(due) => {
                    debug!("Poll tick");
                }
                signal = refresh_rx.recv() => {
                    if signal.is_none() {
                        break;
                    }
                    if !engine.request_refresh(Instant::now()) {
                        continue;
                    }
                    debug!("Manual refresh");
                }
            }

            if events.send(SyncEvent::Started).await.is_err() {
                break;
            }
            let result = engine.fetch().await;
            if events.send(SyncEvent::Finished(result)).await.is_err() {
                break;
            }
        }
        info!("Poller stopped");
    });

    PollerHandle { refresh_tx, task }
}

//! 通知同步：轮询调度、同步状态机、本地缓存

mod engine;
mod poller;
mod schedule;
mod store;

pub use engine::{SyncEngine, SyncOutcome, SyncPhase, SyncResult};
pub use poller::{spawn_poller, PollerHandle, SyncEvent};
pub use schedule::{PollSchedule, MIN_INTERVAL};
pub use store::NotificationStore;

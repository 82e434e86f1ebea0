//! ghn - 在终端里批量处理 GitHub 通知

pub mod api;
pub mod command;
pub mod config;
pub mod credential;
pub mod error;
pub mod executor;
pub mod logging;
pub mod sync;
pub mod system;
pub mod tui;
pub mod types;
pub mod util;

pub use api::{GitHubClient, ListBody, ListResponse, NotificationApi};
pub use command::{parse, CommandBuffer};
pub use config::{Args, Config};
pub use error::{ActionError, ApiError, StartupError};
pub use executor::{ActionExecutor, ExecSummary};
pub use sync::{NotificationStore, SyncEngine, SyncEvent, SyncResult};
pub use system::{Desktop, SystemIntegration};
pub use types::{Action, CommandMap, NotificationThread, Repository, Subject, Visibility};

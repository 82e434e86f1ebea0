//! 交互界面模块

mod app;
mod event;
mod runtime;
mod ui;

pub use app::{App, Effect, StatusLevel, StatusMessage, Submission};
pub use event::{map_key, Input};
pub use runtime::{init_terminal, restore_terminal, run, Tui};
pub use ui::render;

//! 系统集成：浏览器与剪贴板

use crate::error::ActionError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::process::Command;
use tracing::debug;

#[async_trait]
pub trait SystemIntegration: Send + Sync {
    async fn open_in_browser(&self, url: &str) -> Result<(), ActionError>;

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ActionError>;
}

/// 桌面环境实现
///
/// 剪贴板句柄首次复制时打开并一直持有：Linux 上内容由持有者提供，句柄释放后即丢失。
#[derive(Clone, Default)]
pub struct Desktop {
    clipboard: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop").finish_non_exhaustive()
    }
}

/// 复用已打开的句柄，没有时才打开
fn reuse_or_open<T, E>(
    slot: &mut Option<T>,
    open: impl FnOnce() -> Result<T, E>,
) -> Result<&mut T, E> {
    let handle = match slot.take() {
        Some(handle) => handle,
        None => open()?,
    };
    Ok(slot.insert(handle))
}

impl Desktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前平台的浏览器启动命令
    fn browser_command(url: &str) -> (&'static str, Vec<String>) {
        if cfg!(target_os = "macos") {
            ("open", vec![url.to_string()])
        } else if cfg!(target_os = "windows") {
            (
                "cmd",
                vec!["/c".into(), "start".into(), String::new(), url.to_string()],
            )
        } else {
            ("xdg-open", vec![url.to_string()])
        }
    }
}

#[async_trait]
impl SystemIntegration for Desktop {
    async fn open_in_browser(&self, url: &str) -> Result<(), ActionError> {
        let (program, args) = Self::browser_command(url);
        if which::which(program).is_err() {
            return Err(ActionError::LocalIo(format!(
                "browser launcher '{}' not found",
                program
            )));
        }

        debug!(program, url, "Opening in browser");
        let status = Command::new(program)
            .args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| ActionError::LocalIo(format!("failed to spawn {}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::LocalIo(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), ActionError> {
        let text = text.to_string();
        let slot = self.clipboard.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = slot
                .lock()
                .map_err(|_| ActionError::LocalIo("clipboard lock poisoned".to_string()))?;
            let clipboard = reuse_or_open(&mut *guard, arboard::Clipboard::new)
                .map_err(|e| ActionError::LocalIo(format!("clipboard unavailable: {}", e)))?;
            debug!("Copying to clipboard");
            clipboard
                .set_text(text)
                .map_err(|e| ActionError::LocalIo(format!("failed to copy to clipboard: {}", e)))
        })
        .await
        .map_err(|e| ActionError::LocalIo(format!("clipboard task failed: {}", e)))?
    }
}

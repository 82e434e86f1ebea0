//! 终端初始化与主循环

use super::app::{App, Effect};
use super::event::map_key;
use super::ui::render;
use crate::config::Config;
use crate::executor::{ActionExecutor, ExecSummary};
use crate::sync::{spawn_poller, PollerHandle, SyncEngine, SyncEvent};
use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// 界面刷新间隔，用于更新相对时间
const UI_TICK: Duration = Duration::from_secs(1);

pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// 运行交互界面直到用户退出
pub async fn run(config: &Config, engine: SyncEngine, executor: ActionExecutor) -> Result<()> {
    let (sync_tx, sync_rx) = mpsc::channel(16);
    let poller = spawn_poller(engine, sync_tx);

    let mut terminal = init_terminal()?;
    let mut app = App::new(config.include_read);
    let result = event_loop(&mut terminal, &mut app, &poller, executor, sync_rx).await;

    // 出错时也要恢复终端
    restore_terminal(&mut terminal)?;
    poller.cancel();
    info!("TUI stopped");
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    poller: &PollerHandle,
    executor: ActionExecutor,
    mut sync_rx: mpsc::Receiver<SyncEvent>,
) -> Result<()> {
    let (batch_tx, mut batch_rx) = mpsc::channel::<ExecSummary>(8);
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(UI_TICK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| render(app, frame))?;

        let effect = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => map_key(key).and_then(|input| app.handle_input(input)),
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => break,
            },
            Some(event) = sync_rx.recv() => {
                app.on_sync_event(event);
                None
            }
            Some(summary) = batch_rx.recv() => {
                info!(
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    "Batch finished"
                );
                Some(app.on_batch_finished(summary))
            }
            _ = tick.tick() => {
                app.tick(Utc::now());
                None
            }
        };

        match effect {
            Some(Effect::Quit) => break,
            Some(Effect::Refresh) => {
                if !poller.refresh() {
                    error!("Poller is not running");
                }
            }
            Some(Effect::Execute(submission)) => {
                let executor = executor.clone();
                let batch_tx = batch_tx.clone();
                tokio::spawn(async move {
                    let summary = executor
                        .execute(&submission.commands, &submission.snapshot)
                        .await;
                    let _ = batch_tx.send(summary).await;
                });
            }
            None => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

//! TUI 渲染模块

use super::app::{App, StatusLevel};
use crate::types::{Action, NotificationThread, Visibility};
use crate::util::format_relative_time;
use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// 渲染主界面
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // 垂直分割: 标题栏 | 通知列表 | 输入行 | 状态栏
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, vertical[0]);
    render_list(app, frame, vertical[1]);

    let input = Paragraph::new(format!("> {}", app.buffer.raw_text()))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input, vertical[2]);

    render_status(app, frame, vertical[3]);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let filter = if app.include_read { "all" } else { "unread" };
    let mut header = format!(
        " ghn │ {} unread │ {} shown ({})",
        app.store.unread_count(),
        app.store.len(),
        filter
    );
    if app.loading {
        header.push_str(" │ syncing…");
    }
    if app.running_batches > 0 {
        header.push_str(" │ running…");
    }
    let header = Paragraph::new(header).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(header, area);
}

fn render_list(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.buffer.commands();
    let items: Vec<ListItem> = app
        .store
        .threads()
        .iter()
        .enumerate()
        .map(|(i, thread)| {
            let index = i + 1;
            let actions = pending.get(&index).map(Vec::as_slice).unwrap_or(&[]);
            ListItem::new(row_line(index, thread, actions, app.now))
        })
        .collect();

    let title = match app.store.last_synced_at() {
        Some(at) => format!(
            " Notifications (synced {} ago) ",
            format_relative_time(at, app.now)
        ),
        None => " Notifications ".to_string(),
    };

    if items.is_empty() {
        let text = if app.loading || app.store.last_synced_at().is_none() {
            "Loading notifications…"
        } else {
            "Inbox zero"
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}

/// 单行通知：序号、未读标记、仓库、类型、标题、原因、更新时间
fn row_line(
    index: usize,
    thread: &NotificationThread,
    actions: &[Action],
    now: DateTime<Utc>,
) -> Line<'static> {
    let dot = if thread.unread { "●" } else { " " };
    let lock = match thread.repository.visibility {
        Visibility::Private => " 🔒",
        Visibility::Public => "",
    };
    let marks: String = actions.iter().map(|a| a.as_char()).collect();

    let mut spans = vec![
        Span::styled(format!("{:>3} ", index), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} ", dot), Style::default().fg(Color::Green)),
        Span::styled(
            format!("{}{} ", thread.repository.full_name, lock),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("[{}] ", thread.subject.kind),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(thread.subject.title.clone()),
        Span::styled(
            format!("  {} · {}", thread.reason, format_relative_time(thread.updated_at, now)),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if actions.is_empty() {
        return Line::from(spans);
    }

    // 有待执行动作的行高亮并显示动作字母
    spans.push(Span::styled(
        format!("  ⟵ {}", marks),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ));
    Line::from(spans).style(Style::default().bg(Color::Rgb(60, 60, 20)))
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let (text, style) = match &app.status {
        Some(status) => {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::White),
                StatusLevel::Warning => Style::default().fg(Color::Yellow),
                StatusLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
            };
            (format!(" {}", status.text), style)
        }
        None => (
            " [0-9]+[o y r d q] 组合命令  [Enter] 执行  [Esc] 清空  [R] 刷新  [Ctrl-C] 退出"
                .to_string(),
            Style::default().bg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{SyncEvent, SyncResult};
    use crate::tui::event::Input;
    use crate::types::fixtures::threads;
    use ratatui::backend::TestBackend;

    fn screen(app: &App) -> String {
        let backend = TestBackend::new(120, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_rows_and_input() {
        let mut app = App::new(true);
        app.on_sync_event(SyncEvent::Finished(SyncResult::Refreshed {
            seq: 1,
            threads: threads(3),
        }));
        for ch in "2d".chars() {
            app.handle_input(Input::Char(ch));
        }

        let text = screen(&app);
        assert!(text.contains("3 unread"));
        assert!(text.contains("acme/widgets"));
        assert!(text.contains("Thread 2"));
        assert!(text.contains("⟵ d"));
        assert!(text.contains("> 2d"));
    }

    #[test]
    fn test_render_empty_list() {
        let app = App::new(false);
        let text = screen(&app);
        assert!(text.contains("Loading notifications"));
        assert!(text.contains("0 shown (unread)"));
    }
}

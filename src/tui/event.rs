//! 按键映射

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 应用层输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Clear,
    Submit,
    Refresh,
    Quit,
}

/// 把终端按键转换为应用输入
pub fn map_key(key: KeyEvent) -> Option<Input> {
    // Windows 下会同时收到 Release 事件
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            KeyCode::Char('u') => Some(Input::Clear),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(Input::Submit),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Esc => Some(Input::Clear),
        KeyCode::Char('R') => Some(Input::Refresh),
        KeyCode::Char(ch) => Some(Input::Char(ch)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_editing_keys() {
        assert_eq!(map_key(key(KeyCode::Char('3'))), Some(Input::Char('3')));
        assert_eq!(map_key(key(KeyCode::Char('d'))), Some(Input::Char('d')));
        assert_eq!(map_key(key(KeyCode::Backspace)), Some(Input::Backspace));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Input::Clear));
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Input::Submit));
        assert_eq!(map_key(key(KeyCode::Up)), None);
    }

    #[test]
    fn test_map_control_keys() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl('c')), Some(Input::Quit));
        assert_eq!(map_key(ctrl('u')), Some(Input::Clear));
        assert_eq!(map_key(ctrl('d')), None);
    }

    #[test]
    fn test_shift_r_refreshes() {
        let shifted = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted), Some(Input::Refresh));
        // 小写 r 是标记已读
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Input::Char('r')));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut release = key(KeyCode::Char('1'));
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}

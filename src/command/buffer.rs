//! 交互命令缓冲区
//!
//! 只保存原始文本；每次编辑后都对完整文本重新解析，
//! 提交时使用的命令集合与实时高亮始终一致。

use super::parser::{is_command_char, parse};
use crate::types::{Action, CommandMap};

#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    raw_text: String,
    parsed: CommandMap,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// 最近一次解析得到的命令（用于高亮）
    pub fn commands(&self) -> &CommandMap {
        &self.parsed
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty()
    }

    /// 上一个动作之后录入的序号
    ///
    /// 文本以数字结尾时返回尾部数字的值，值为 0 时视为没有序号。
    pub fn pending_number(&self) -> Option<usize> {
        let digits: Vec<u32> = self
            .raw_text
            .chars()
            .rev()
            .map_while(|c| c.to_digit(10))
            .collect();
        if digits.is_empty() {
            return None;
        }
        let value = digits
            .iter()
            .rev()
            .fold(0usize, |acc, d| acc.saturating_mul(10).saturating_add(*d as usize));
        (value > 0).then_some(value)
    }

    pub fn append_digit(&mut self, digit: u8, notification_count: usize) {
        if digit > 9 {
            return;
        }
        self.raw_text.push(char::from(b'0' + digit));
        self.reparse(notification_count);
    }

    pub fn append_action(&mut self, action: Action, notification_count: usize) {
        self.raw_text.push(action.as_char());
        self.reparse(notification_count);
    }

    /// 追加分隔符（空格、逗号）
    pub fn append_separator(&mut self, ch: char, notification_count: usize) {
        self.raw_text.push(ch);
        self.reparse(notification_count);
    }

    /// 按字符录入，非命令字符被忽略；返回是否接受
    pub fn push_char(&mut self, ch: char, notification_count: usize) -> bool {
        if !is_command_char(ch) {
            return false;
        }
        if let Some(digit) = ch.to_digit(10) {
            self.append_digit(digit as u8, notification_count);
        } else if let Some(action) = Action::from_char(ch) {
            self.append_action(action, notification_count);
        } else {
            self.append_separator(ch, notification_count);
        }
        true
    }

    pub fn backspace(&mut self, notification_count: usize) {
        if self.raw_text.pop().is_some() {
            self.reparse(notification_count);
        }
    }

    pub fn clear(&mut self) {
        self.raw_text.clear();
        self.parsed.clear();
    }

    /// 列表长度变化后重新校验序号
    pub fn reparse(&mut self, notification_count: usize) {
        self.parsed = parse(&self.raw_text, notification_count);
    }

    /// 提交：按当前列表长度重新解析并清空缓冲区
    pub fn take(&mut self, notification_count: usize) -> CommandMap {
        let commands = parse(&self.raw_text, notification_count);
        self.clear();
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action::*;

    fn type_str(buffer: &mut CommandBuffer, text: &str, count: usize) {
        for ch in text.chars() {
            buffer.push_char(ch, count);
        }
    }

    #[test]
    fn test_typing_updates_commands() {
        let mut buffer = CommandBuffer::new();
        buffer.append_digit(1, 5);
        assert!(buffer.commands().is_empty());
        assert_eq!(buffer.pending_number(), Some(1));

        buffer.append_action(Open, 5);
        assert_eq!(buffer.commands().get(&1), Some(&vec![Open]));
        assert_eq!(buffer.pending_number(), None);
        assert_eq!(buffer.raw_text(), "1o");
    }

    #[test]
    fn test_pending_number_tracks_trailing_digits() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "1o12", 20);
        assert_eq!(buffer.pending_number(), Some(12));

        buffer.backspace(20);
        assert_eq!(buffer.pending_number(), Some(1));

        buffer.backspace(20);
        assert_eq!(buffer.pending_number(), None);
        assert_eq!(buffer.raw_text(), "1o");
    }

    #[test]
    fn test_pending_number_zero_is_none() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "00", 5);
        assert_eq!(buffer.pending_number(), None);
    }

    #[test]
    fn test_backspace_removes_action() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "3d", 5);
        assert_eq!(buffer.commands().get(&3), Some(&vec![MarkDone]));

        buffer.backspace(5);
        assert!(buffer.commands().is_empty());
        assert_eq!(buffer.pending_number(), Some(3));
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut buffer = CommandBuffer::new();
        buffer.backspace(5);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "1o2d", 5);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.commands().is_empty());
        assert_eq!(buffer.pending_number(), None);
    }

    #[test]
    fn test_ignores_non_command_chars() {
        let mut buffer = CommandBuffer::new();
        assert!(!buffer.push_char('x', 5));
        assert!(!buffer.push_char('-', 5));
        assert!(buffer.push_char(',', 5));
        assert_eq!(buffer.raw_text(), ",");
    }

    #[test]
    fn test_reparse_after_list_shrinks() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "1o5d", 5);
        assert_eq!(buffer.commands().len(), 2);

        buffer.reparse(3);
        assert_eq!(buffer.commands().len(), 1);
        assert_eq!(buffer.commands().get(&1), Some(&vec![Open]));
        assert_eq!(buffer.raw_text(), "1o5d");
    }

    #[test]
    fn test_take_uses_live_count() {
        let mut buffer = CommandBuffer::new();
        type_str(&mut buffer, "1o5d", 5);

        let commands = buffer.take(4);
        assert_eq!(commands.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.commands().is_empty());
    }
}

//! 命令解析
//!
//! 单遍从左到右扫描：数字累积成序号，动作字符把动作挂到当前序号上。
//! 动作之后出现的数字开始一个新序号；其它任意字符重置扫描状态。
//! 越界序号（包括 0）被静默丢弃，不影响后续解析。

use crate::types::{Action, CommandMap};

/// 交互输入框允许录入的字符
pub fn is_command_char(ch: char) -> bool {
    ch.is_ascii_digit() || Action::from_char(ch).is_some() || ch == ' ' || ch == ','
}

/// 把原始输入解析为命令集合
///
/// 纯函数：相同的 `(input, notification_count)` 总是得到相同结果。
pub fn parse(input: &str, notification_count: usize) -> CommandMap {
    let mut result = CommandMap::new();
    if notification_count == 0 {
        return result;
    }

    let mut current_number: usize = 0;
    let mut has_number = false;
    let mut just_saw_action = false;

    for ch in input.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let digit = digit as usize;
            if just_saw_action {
                current_number = digit;
                just_saw_action = false;
            } else {
                // 超长数字串饱和到 usize::MAX，必然越界
                current_number = current_number.saturating_mul(10).saturating_add(digit);
            }
            has_number = true;
            continue;
        }

        if let Some(action) = Action::from_char(ch) {
            if has_number && (1..=notification_count).contains(&current_number) {
                result.entry(current_number).or_default().push(action);
            }
            just_saw_action = true;
            continue;
        }

        current_number = 0;
        has_number = false;
        just_saw_action = false;
    }

    result
}

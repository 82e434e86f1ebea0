//! 命令语言：把按键文本解析成 (序号, 动作) 批次

mod buffer;
mod parser;

pub use buffer::CommandBuffer;
pub use parser::{is_command_char, parse};

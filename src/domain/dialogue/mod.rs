//! Dialogue Context - 对话解析
//!
//! 把生成器输出的自由文本对话切分为有序的 (说话人, 台词) 轮次

mod parser;

pub use parser::{DialogueParser, DialogueTurn, ParseError, ParserConfig, DEFAULT_KNOWN_SPEAKERS};

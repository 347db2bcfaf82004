//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：生成练习音频

mod audio_commands;

pub mod handlers;

pub use audio_commands::*;

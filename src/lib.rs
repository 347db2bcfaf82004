//! Parla - 多说话人听力练习音频生成
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Exercise: 练习记录与内容哈希
//! - Dialogue: 对话解析（说话人 + 台词）
//! - Voice: 角色识别、引擎档位与音色分配
//!
//! 应用层 (application/):
//! - Ports: TtsEngine, AudioMuxer
//! - Pipeline: 片段合成、拼接、调用上下文
//! - Commands: 生成练习音频（编排）
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP / Polly / Fake TTS, ffmpeg / Fake 拼接
//! - HTTP: RESTful API + 音频文件托管

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

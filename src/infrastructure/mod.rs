//! Infrastructure Layer - 基础设施层
//!
//! - adapters: 出站端口实现（TTS 服务、ffmpeg）
//! - http: 入站 HTTP 接口

pub mod adapters;
pub mod http;

//! Audio Muxer Port - 音频拼接抽象
//!
//! 外部拼接进程（ffmpeg）的抽象接口，测试中使用假实现

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 拼接错误
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("Failed to start muxer: {0}")]
    Spawn(String),

    #[error("Muxer exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },

    #[error("Muxer timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 拼接目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxTarget {
    pub output_path: PathBuf,
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 比特率，如 "192k"
    pub bitrate: String,
}

/// Audio Muxer Port
#[async_trait]
pub trait AudioMuxerPort: Send + Sync {
    /// 按顺序拼接输入文件，写出到 `target.output_path`
    async fn concat(&self, inputs: &[PathBuf], target: &MuxTarget) -> Result<(), MuxError>;
}

//! Fake Audio Muxer - 不依赖 ffmpeg 的拼接实现
//!
//! 直接按顺序拼接输入文件的字节，并记录调用

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::application::ports::{AudioMuxerPort, MuxError, MuxTarget};

#[derive(Default)]
struct Recorded {
    calls: usize,
    last_inputs: Vec<PathBuf>,
    last_target: Option<MuxTarget>,
}

/// Fake Audio Muxer
#[derive(Default)]
pub struct FakeAudioMuxer {
    fail: bool,
    hang: bool,
    recorded: Mutex<Recorded>,
}

impl FakeAudioMuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次调用都以进程失败返回，不写出任何文件
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 记录调用后永不返回，用于模拟被取消的拼接
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner()).calls
    }

    pub fn last_inputs(&self) -> Vec<PathBuf> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_inputs
            .clone()
    }

    pub fn last_target(&self) -> Option<MuxTarget> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_target
            .clone()
    }
}

#[async_trait]
impl AudioMuxerPort for FakeAudioMuxer {
    async fn concat(&self, inputs: &[PathBuf], target: &MuxTarget) -> Result<(), MuxError> {
        {
            let mut recorded = self.recorded.lock().unwrap_or_else(|e| e.into_inner());
            recorded.calls += 1;
            recorded.last_inputs = inputs.to_vec();
            recorded.last_target = Some(target.clone());
        }

        if self.hang {
            std::future::pending::<()>().await;
        }

        if self.fail {
            return Err(MuxError::ProcessFailed {
                status: "exit status: 1".into(),
                stderr: "fake muxer failure".into(),
            });
        }

        let mut combined = Vec::new();
        for input in inputs {
            let bytes = tokio::fs::read(input)
                .await
                .map_err(|e| MuxError::IoError(format!("{}: {}", input.display(), e)))?;
            combined.extend_from_slice(&bytes);
        }

        tokio::fs::write(&target.output_path, combined)
            .await
            .map_err(|e| MuxError::IoError(e.to_string()))?;

        tracing::debug!(
            inputs = inputs.len(),
            output = %target.output_path.display(),
            "FakeAudioMuxer: concatenated"
        );
        Ok(())
    }
}

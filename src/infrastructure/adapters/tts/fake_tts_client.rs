//! Fake TTS Client - 用于测试和离线开发的 TTS 客户端
//!
//! 不实际调用 TTS 服务，返回固定的音频数据，并记录收到的请求

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 每次返回的音频字节数
    pub audio_size: usize,
    /// 对这些音色返回服务错误
    pub failing_voices: Vec<String>,
    /// 模拟合成延迟
    pub latency: Duration,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_size: 2048,
            failing_voices: Vec::new(),
            latency: Duration::ZERO,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    audio_data: Vec<u8>,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        let audio_data = (0..config.audio_size).map(|i| (i % 251) as u8).collect();
        Self {
            config,
            audio_data,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 始终返回指定音频文件的内容
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let audio_data = std::fs::read(path)?;
        tracing::info!(
            path = %path.display(),
            size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self {
            config: FakeTtsClientConfig {
                audio_size: audio_data.len(),
                ..Default::default()
            },
            audio_data,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 已收到的请求（按顺序）
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            engine = %request.engine,
            "FakeTtsClient: returning fixed audio"
        );

        let fail = self.config.failing_voices.contains(&request.voice_id);
        let voice_id = request.voice_id.clone();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if fail {
            return Err(TtsError::ServiceError(format!("voice unavailable: {}", voice_id)));
        }

        Ok(SynthesisResponse {
            request_id: format!("fake-{}", uuid::Uuid::new_v4()),
            audio_data: self.audio_data.clone(),
        })
    }
}

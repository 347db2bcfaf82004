//! Application State
//!
//! 路由共享的 Handler 与端口

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{GenerateAudioHandler, TtsEnginePort};

/// 应用状态
pub struct AppState {
    pub generate_audio_handler: Arc<GenerateAudioHandler>,
    pub tts_engine: Arc<dyn TtsEnginePort>,
    /// 拼接音频下载地址使用的 Base URL
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        generate_audio_handler: Arc<GenerateAudioHandler>,
        tts_engine: Arc<dyn TtsEnginePort>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            generate_audio_handler,
            tts_engine,
            public_base_url: public_base_url.into(),
        }
    }

    /// 最终音频所在目录（通过 /audio 托管）
    pub fn audio_dir(&self) -> PathBuf {
        self.generate_audio_handler.config().cache_dir.clone()
    }

    /// 音频文件的公开下载地址
    pub fn audio_url(&self, file_name: &str) -> String {
        format!(
            "{}/audio/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        )
    }
}

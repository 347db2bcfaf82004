//! Polly TTS Client - Amazon Polly SynthesizeSpeech
//!
//! 通过 AWS SDK 调用 Polly；凭证走默认链（环境变量、配置文件、IAM 角色）

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, TextType as PollyTextType, VoiceId};
use aws_sdk_polly::Client as PollyClient;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{
    SynthesisRequest, SynthesisResponse, TextType, TtsEnginePort, TtsError,
};

/// Polly 单次请求的最大字符数
const MAX_TEXT_LENGTH: usize = 3000;

/// Polly 客户端配置
#[derive(Debug, Clone)]
pub struct PollyTtsClientConfig {
    /// AWS 区域
    pub region: String,
}

impl Default for PollyTtsClientConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
        }
    }
}

/// Amazon Polly TTS 客户端
pub struct PollyTtsClient {
    client: PollyClient,
    region: String,
    request_counter: AtomicU64,
}

impl PollyTtsClient {
    /// 加载 AWS 配置并创建客户端
    pub async fn new(config: PollyTtsClientConfig) -> Result<Self, TtsError> {
        if config.region.trim().is_empty() {
            return Err(TtsError::InvalidConfiguration("AWS region is empty".into()));
        }

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        tracing::info!(region = %config.region, "Polly client initialized");

        Ok(Self {
            client: PollyClient::new(&aws_config),
            region: config.region,
            request_counter: AtomicU64::new(0),
        })
    }
}

fn text_type_to_sdk(text_type: TextType) -> PollyTextType {
    match text_type {
        TextType::Text => PollyTextType::Text,
        TextType::Ssml => PollyTextType::Ssml,
    }
}

#[async_trait]
impl TtsEnginePort for PollyTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        if request.text.len() > MAX_TEXT_LENGTH {
            return Err(TtsError::InvalidConfiguration(format!(
                "Text length {} exceeds maximum {} characters",
                request.text.len(),
                MAX_TEXT_LENGTH
            )));
        }

        let request_id = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::debug!(
            request_id,
            text_len = request.text.len(),
            voice = %request.voice_id,
            engine = %request.engine,
            region = %self.region,
            "Synthesizing text with Amazon Polly"
        );

        let response = self
            .client
            .synthesize_speech()
            .engine(Engine::from(request.engine.as_str()))
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .output_format(OutputFormat::from(request.output_format.as_str()))
            .text(request.text)
            .text_type(text_type_to_sdk(request.text_type))
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(request_id, error = %e, "Polly API error");
                TtsError::ServiceError(format!("Polly API error: {}", e))
            })?;

        let audio_data = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| {
                TtsError::InvalidResponse(format!("Failed to read audio stream: {}", e))
            })?
            .into_bytes()
            .to_vec();

        tracing::debug!(request_id, audio_bytes = audio_data.len(), "Polly synthesis completed");

        Ok(SynthesisResponse {
            request_id: format!("polly-{}", request_id),
            audio_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_type_conversion() {
        assert_eq!(text_type_to_sdk(TextType::Ssml), PollyTextType::Ssml);
        assert_eq!(text_type_to_sdk(TextType::Text), PollyTextType::Text);
    }

    #[test]
    fn test_engine_names_match_sdk() {
        assert_eq!(Engine::from("long-form"), Engine::LongForm);
        assert_eq!(Engine::from("neural"), Engine::Neural);
        assert_eq!(OutputFormat::from("mp3"), OutputFormat::Mp3);
        assert_eq!(OutputFormat::from("ogg_vorbis"), OutputFormat::OggVorbis);
    }
}

//! HTTP TTS Client - 调用外部 TTS HTTP 网关
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部 TTS 服务
//!
//! 外部 TTS API:
//! POST http://localhost:8000/api/tts/synthesize
//! Request: {"engine": "neural", "language_code": "es-ES", "output_format": "mp3",
//!           "text": "<speak>...</speak>", "text_type": "ssml", "voice_id": "Lucia"}  (JSON)
//! Response: audio binary, request id in headers

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// TTS 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    engine: &'a str,
    language_code: &'a str,
    output_format: &'a str,
    text: &'a str,
    text_type: &'a str,
    voice_id: &'a str,
}

impl<'a> From<&'a SynthesisRequest> for TtsHttpRequest<'a> {
    fn from(request: &'a SynthesisRequest) -> Self {
        Self {
            engine: request.engine.as_str(),
            language_code: &request.language_code,
            output_format: request.output_format.as_str(),
            text: &request.text,
            text_type: request.text_type.as_str(),
            voice_id: &request.voice_id,
        }
    }
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!("{}/api/tts/synthesize", self.config.base_url.trim_end_matches('/'))
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let body = TtsHttpRequest::from(&request);

        tracing::debug!(
            url = %self.synthesize_url(),
            text_len = body.text.len(),
            voice_id = %body.voice_id,
            engine = %body.engine,
            "Sending TTS synthesize request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let request_id = response
            .headers()
            .get("X-TTS-Request-Id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            request_id = %request_id,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            request_id,
            audio_data,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioFormat, TextType};
    use crate::domain::EngineTier;

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTtsClientConfig::new("http://example.com:9000/").with_timeout(30);
        let client = HttpTtsClient::new(config).unwrap();
        assert_eq!(client.synthesize_url(), "http://example.com:9000/api/tts/synthesize");
        assert_eq!(client.config.timeout_secs, 30);
    }

    #[test]
    fn test_request_body_uses_provider_names() {
        let request = SynthesisRequest {
            engine: EngineTier::LongForm,
            language_code: "es-ES".into(),
            output_format: AudioFormat::Mp3,
            text: "<speak>Hola.</speak>".into(),
            text_type: TextType::Ssml,
            voice_id: "Alba".into(),
        };
        let json = serde_json::to_value(TtsHttpRequest::from(&request)).unwrap();
        assert_eq!(json["engine"], "long-form");
        assert_eq!(json["output_format"], "mp3");
        assert_eq!(json["text_type"], "ssml");
        assert_eq!(json["voice_id"], "Alba");
    }
}

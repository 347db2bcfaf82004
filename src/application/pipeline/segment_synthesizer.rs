//! Segment Synthesizer - 单段语音合成
//!
//! 文本规范化 → SSML → TTS 请求 → 临时文件。
//! 合成失败或音频过小是软失败，由调用方记录后跳过该段。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempPath;
use thiserror::Error;

use crate::application::ports::{AudioFormat, SynthesisRequest, TextType, TtsEnginePort, TtsError};
use crate::domain::EngineTier;

/// 默认最小音频字节数
pub const DEFAULT_MIN_AUDIO_BYTES: usize = 1000;

/// 单段合成错误（软失败）
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("TTS request failed: {0}")]
    Tts(#[from] TtsError),

    #[error("TTS request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Audio too small: {size} bytes (minimum {min})")]
    Undersized { size: usize, min: usize },

    #[error("Temporary file error: {0}")]
    Resource(String),
}

/// 合成配置
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// 语言代码
    pub language_code: String,
    /// 输出编码
    pub output_format: AudioFormat,
    /// 小于该字节数的响应视为失败
    pub min_audio_bytes: usize,
    /// 单次请求超时
    pub timeout: Duration,
    /// 临时片段目录
    pub temp_dir: PathBuf,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            language_code: "es-ES".to_string(),
            output_format: AudioFormat::Mp3,
            min_audio_bytes: DEFAULT_MIN_AUDIO_BYTES,
            timeout: Duration::from_secs(60),
            temp_dir: std::env::temp_dir().join("parla"),
        }
    }
}

/// 待合成的片段
///
/// ordinal 在构建计划时分配，与合成完成顺序无关
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentJob {
    pub ordinal: usize,
    /// 播报的说话人标签（Introduction / 说话人 / Question）
    pub speaker: String,
    pub voice_id: String,
    pub text: String,
}

/// 合成产物（临时音频文件）
///
/// 持有 [`TempPath`]：无论拼接成功与否，drop 时都会删除文件
#[derive(Debug)]
pub struct SegmentArtifact {
    pub ordinal: usize,
    pub speaker: String,
    pub voice_id: String,
    pub size_bytes: u64,
    path: TempPath,
}

impl SegmentArtifact {
    pub fn new(
        ordinal: usize,
        speaker: impl Into<String>,
        voice_id: impl Into<String>,
        size_bytes: u64,
        path: TempPath,
    ) -> Self {
        Self {
            ordinal,
            speaker: speaker.into(),
            voice_id: voice_id.into(),
            size_bytes,
            path,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// 删除临时文件，返回删除失败的错误以便记录
    pub fn release(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// 去掉问号，首尾句点/空格，并以句点结尾
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| !matches!(c, '?' | '¿')).collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    format!("{}.", trimmed)
}

fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 构建最简 SSML，可选地在前面播报说话人
pub fn build_markup(text: &str, speaker: Option<&str>) -> String {
    let body = escape_markup(&normalize_text(text));
    match speaker.map(str::trim).filter(|s| !s.is_empty()) {
        Some(speaker) => format!("<speak>{}: {}</speak>", escape_markup(speaker), body),
        None => format!("<speak>{}</speak>", body),
    }
}

/// 单段合成器
pub struct SegmentSynthesizer {
    tts_engine: Arc<dyn TtsEnginePort>,
    config: SynthesizerConfig,
}

impl SegmentSynthesizer {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>, config: SynthesizerConfig) -> Self {
        Self { tts_engine, config }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// 合成一个片段并写入唯一命名的临时文件
    pub async fn synthesize(
        &self,
        job: &SegmentJob,
        engine: EngineTier,
    ) -> Result<SegmentArtifact, SynthesisError> {
        let markup = build_markup(&job.text, Some(&job.speaker));

        tracing::debug!(
            ordinal = job.ordinal,
            speaker = %job.speaker,
            voice = %job.voice_id,
            engine = %engine,
            ssml = %markup,
            "Generating audio segment"
        );

        let request = SynthesisRequest {
            engine,
            language_code: self.config.language_code.clone(),
            output_format: self.config.output_format,
            text: markup,
            text_type: TextType::Ssml,
            voice_id: job.voice_id.clone(),
        };

        let timeout = self.config.timeout;
        let response = tokio::time::timeout(timeout, self.tts_engine.synthesize(request))
            .await
            .map_err(|_| SynthesisError::Timeout(timeout))??;

        let size = response.audio_data.len();
        if size < self.config.min_audio_bytes {
            return Err(SynthesisError::Undersized {
                size,
                min: self.config.min_audio_bytes,
            });
        }

        let path = self.persist(&response.audio_data).await?;

        tracing::info!(
            ordinal = job.ordinal,
            speaker = %job.speaker,
            voice = %job.voice_id,
            request_id = %response.request_id,
            size_bytes = size,
            path = %path.display(),
            "Audio segment ready"
        );

        Ok(SegmentArtifact::new(
            job.ordinal,
            job.speaker.clone(),
            job.voice_id.clone(),
            size as u64,
            path,
        ))
    }

    async fn persist(&self, audio_data: &[u8]) -> Result<TempPath, SynthesisError> {
        tokio::fs::create_dir_all(&self.config.temp_dir)
            .await
            .map_err(|e| SynthesisError::Resource(e.to_string()))?;

        let path = tempfile::Builder::new()
            .prefix("segment_")
            .suffix(&format!(".{}", self.config.output_format.extension()))
            .tempfile_in(&self.config.temp_dir)
            .map_err(|e| SynthesisError::Resource(e.to_string()))?
            .into_temp_path();

        // 写入失败时 path 被 drop，文件随之删除
        tokio::fs::write(&path, audio_data)
            .await
            .map_err(|e| SynthesisError::Resource(e.to_string()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeTtsClient, FakeTtsClientConfig};

    fn job(text: &str) -> SegmentJob {
        SegmentJob {
            ordinal: 3,
            speaker: "Camarero".to_string(),
            voice_id: "Lucia".to_string(),
            text: text.to_string(),
        }
    }

    fn synthesizer(tts: Arc<FakeTtsClient>, temp_dir: &Path) -> SegmentSynthesizer {
        SegmentSynthesizer::new(
            tts,
            SynthesizerConfig {
                temp_dir: temp_dir.to_path_buf(),
                timeout: Duration::from_secs(5),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("¿Dónde está?."), "Dónde está.");
        assert_eq!(normalize_text("  Allí...  "), "Allí.");
        assert_eq!(normalize_text("Paella por 15 euros"), "Paella por 15 euros.");
    }

    #[test]
    fn test_build_markup() {
        assert_eq!(
            build_markup("¿Cuál es el especial?", Some("Cliente")),
            "<speak>Cliente: Cuál es el especial.</speak>"
        );
        assert_eq!(build_markup("Hola", None), "<speak>Hola.</speak>");
        assert_eq!(
            build_markup("Pan & vino", Some(" ")),
            "<speak>Pan &amp; vino.</speak>"
        );
    }

    #[tokio::test]
    async fn test_synthesize_writes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let synthesizer = synthesizer(tts.clone(), dir.path());

        let artifact = synthesizer
            .synthesize(&job("Paella por 15 euros."), EngineTier::Neural)
            .await
            .unwrap();

        assert_eq!(artifact.ordinal, 3);
        assert_eq!(artifact.voice_id, "Lucia");
        assert!(artifact.file_path().starts_with(dir.path()));
        assert_eq!(
            std::fs::metadata(artifact.file_path()).unwrap().len(),
            artifact.size_bytes
        );

        let requests = tts.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].engine, EngineTier::Neural);
        assert_eq!(requests[0].language_code, "es-ES");
        assert_eq!(requests[0].text_type, TextType::Ssml);
        assert_eq!(requests[0].text, "<speak>Camarero: Paella por 15 euros.</speak>");

        let path = artifact.file_path().to_path_buf();
        artifact.release().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_undersized_audio_is_soft_failure() {
        let dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            audio_size: 10,
            ..Default::default()
        }));
        let synthesizer = synthesizer(tts, dir.path());

        let result = synthesizer.synthesize(&job("Hola"), EngineTier::Standard).await;

        assert!(matches!(
            result,
            Err(SynthesisError::Undersized { size: 10, min: DEFAULT_MIN_AUDIO_BYTES })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            latency: Duration::from_secs(3),
            ..Default::default()
        }));
        let synthesizer = SegmentSynthesizer::new(
            tts.clone(),
            SynthesizerConfig {
                temp_dir: dir.path().to_path_buf(),
                timeout: Duration::from_millis(100),
                ..Default::default()
            },
        );

        let result = synthesizer.synthesize(&job("Hola"), EngineTier::Standard).await;

        assert!(matches!(
            result,
            Err(SynthesisError::Timeout(t)) if t == Duration::from_millis(100)
        ));
        assert_eq!(tts.requests().len(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_soft_failure() {
        let dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            failing_voices: vec!["Lucia".to_string()],
            ..Default::default()
        }));
        let synthesizer = synthesizer(tts, dir.path());

        let result = synthesizer.synthesize(&job("Hola"), EngineTier::Standard).await;
        assert!(matches!(result, Err(SynthesisError::Tts(_))));
    }

    #[tokio::test]
    async fn test_dropped_artifact_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let synthesizer = synthesizer(tts, dir.path());

        let artifact = synthesizer.synthesize(&job("Hola"), EngineTier::Standard).await.unwrap();
        let path = artifact.file_path().to_path_buf();
        assert!(path.exists());
        drop(artifact);
        assert!(!path.exists());
    }
}

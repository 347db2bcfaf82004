//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PARLA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `PARLA_SERVER__PORT=8080`
/// - `PARLA_TTS__PROVIDER=polly`
/// - `PARLA_TTS__ENGINE=long-form`
/// - `PARLA_AUDIO__FFMPEG_PATH=/usr/local/bin/ffmpeg`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）；列表类字段走 serde 默认
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("tts.provider", "http")?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 60)?
        .set_default("tts.region", "us-east-1")?
        .set_default("tts.engine", "standard")?
        .set_default("tts.language_code", "es-ES")?
        .set_default("tts.output_format", "mp3")?
        .set_default("tts.min_audio_bytes", 1000)?
        .set_default("audio.ffmpeg_path", "ffmpeg")?
        .set_default("audio.sample_rate", 24000)?
        .set_default("audio.channels", 1)?
        .set_default("audio.bitrate", "192k")?
        .set_default("audio.timeout_secs", 120)?
        .set_default("audio.reuse_cached", true)?
        .set_default("storage.cache_dir", "data/audio_cache")?
        .set_default("storage.temp_dir", "data/tmp")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: PARLA_TTS__URL=http://tts-server:8000
    builder = builder.add_source(
        Environment::with_prefix("PARLA")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.provider == TtsProvider::Http && config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.provider == TtsProvider::Polly && config.tts.region.is_empty() {
        return Err(ConfigError::ValidationError(
            "AWS region cannot be empty".to_string(),
        ));
    }

    if config.tts.timeout_secs == 0 || config.audio.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Timeouts must be greater than 0".to_string(),
        ));
    }

    if config.audio.sample_rate == 0 || config.audio.channels == 0 {
        return Err(ConfigError::ValidationError(
            "Sample rate and channels must be greater than 0".to_string(),
        ));
    }

    if config.audio.bitrate.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Bitrate cannot be empty".to_string(),
        ));
    }

    if config.parser.known_speakers.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "Known speaker labels cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("TTS Provider: {}", config.tts.provider.as_str());
    match config.tts.provider {
        TtsProvider::Http => tracing::info!("TTS URL: {}", config.tts.url),
        TtsProvider::Polly => tracing::info!("AWS Region: {}", config.tts.region),
        TtsProvider::Fake => {}
    }
    tracing::info!("TTS Engine: {}", config.tts.engine);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!(
        "Audio: {} Hz, {} ch, {}",
        config.audio.sample_rate,
        config.audio.channels,
        config.audio.bitrate
    );
    tracing::info!("ffmpeg: {:?}", config.audio.ffmpeg_path);
    tracing::info!("Cache Directory: {:?}", config.storage.cache_dir);
    tracing::info!("Temp Directory: {:?}", config.storage.temp_dir);
    tracing::info!("Known Speakers: {}", config.parser.known_speakers.len());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EngineTier;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_url_only_matters_for_http() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());

        config.tts.provider = TtsProvider::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.audio.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_blank_speaker() {
        let mut config = AppConfig::default();
        config.parser.known_speakers.push("  ".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[tts]
provider = "fake"
engine = "neural"
min_audio_bytes = 10

[parser]
known_speakers = ["Guía", "Viajero"]
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.tts.provider, TtsProvider::Fake);
        assert_eq!(config.tts.engine, EngineTier::Neural);
        assert_eq!(config.tts.min_audio_bytes, 10);
        assert_eq!(config.parser.known_speakers, vec!["Guía", "Viajero"]);
        assert_eq!(config.audio.bitrate, "192k");
    }
}

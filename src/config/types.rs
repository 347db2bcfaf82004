//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::AudioFormat;
use crate::domain::dialogue::DEFAULT_KNOWN_SPEAKERS;
use crate::domain::EngineTier;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音频拼接配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 对话解析配置
    #[serde(default)]
    pub parser: ParserSection,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（用于拼接音频下载地址）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// TTS 服务提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// JSON-over-HTTP 网关
    #[default]
    Http,
    /// Amazon Polly
    Polly,
    /// 离线假实现
    Fake,
}

impl TtsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProvider::Http => "http",
            TtsProvider::Polly => "polly",
            TtsProvider::Fake => "fake",
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 提供方
    #[serde(default)]
    pub provider: TtsProvider,

    /// HTTP 网关基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 单次合成超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// AWS 区域（provider = polly）
    #[serde(default = "default_region")]
    pub region: String,

    /// 默认引擎档位
    #[serde(default)]
    pub engine: EngineTier,

    /// 语言代码
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// 输出编码
    #[serde(default)]
    pub output_format: AudioFormat,

    /// 小于该字节数的音频视为失败
    #[serde(default = "default_min_audio_bytes")]
    pub min_audio_bytes: usize,

    /// provider = fake 时返回的音频文件，未设置则返回固定字节
    #[serde(default)]
    pub fake_audio_file: Option<PathBuf>,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    60
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_language_code() -> String {
    "es-ES".to_string()
}

fn default_min_audio_bytes() -> usize {
    1000
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            region: default_region(),
            engine: EngineTier::default(),
            language_code: default_language_code(),
            output_format: AudioFormat::default(),
            min_audio_bytes: default_min_audio_bytes(),
            fake_audio_file: None,
        }
    }
}

/// 音频拼接配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// ffmpeg 可执行文件
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// 目标采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 声道数
    #[serde(default = "default_channels")]
    pub channels: u8,

    /// 目标比特率
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// 拼接进程超时时间（秒）
    #[serde(default = "default_audio_timeout")]
    pub timeout_secs: u64,

    /// 同内容音频已存在时直接复用
    #[serde(default = "default_reuse_cached")]
    pub reuse_cached: bool,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_channels() -> u8 {
    1 // 单声道
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_audio_timeout() -> u64 {
    120
}

fn default_reuse_cached() -> bool {
    true
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            bitrate: default_bitrate(),
            timeout_secs: default_audio_timeout(),
            reuse_cached: default_reuse_cached(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 最终音频目录（同时通过 /audio 对外提供）
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// 临时片段目录
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/audio_cache")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("data/tmp")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

/// 对话解析配置
#[derive(Debug, Clone, Deserialize)]
pub struct ParserSection {
    /// 已知说话人标签
    #[serde(default = "default_known_speakers")]
    pub known_speakers: Vec<String>,
}

fn default_known_speakers() -> Vec<String> {
    DEFAULT_KNOWN_SPEAKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            known_speakers: default_known_speakers(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

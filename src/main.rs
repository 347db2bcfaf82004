//! Parla - 多说话人听力练习音频生成服务
//!
//! 启动顺序：配置 → 日志 → 目录 → TTS / ffmpeg 适配器 → 生成 Handler → HTTP

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parla::application::{
    AssemblerConfig, AudioAssembler, GenerateAudioConfig, GenerateAudioHandler, SegmentSynthesizer,
    SynthesizerConfig, TtsEnginePort,
};
use parla::config::{load_config, print_config, AppConfig, LogConfig, TtsProvider};
use parla::domain::{DialogueParser, ParserConfig};
use parla::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FfmpegMuxer, FfmpegMuxerConfig, HttpTtsClient,
    HttpTtsClientConfig, PollyTtsClient, PollyTtsClientConfig,
};
use parla::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},parla={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置选择 TTS 提供方
async fn build_tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let tts = &config.tts;
    let engine: Arc<dyn TtsEnginePort> = match tts.provider {
        TtsProvider::Http => Arc::new(HttpTtsClient::new(
            HttpTtsClientConfig::new(&tts.url).with_timeout(tts.timeout_secs),
        )?),
        TtsProvider::Polly => Arc::new(
            PollyTtsClient::new(PollyTtsClientConfig {
                region: tts.region.clone(),
            })
            .await?,
        ),
        TtsProvider::Fake => match &tts.fake_audio_file {
            Some(path) => Arc::new(
                FakeTtsClient::from_file(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            ),
            None => Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default())),
        },
    };
    Ok(engine)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().context("Failed to load config")?;

    init_tracing(&config.log);

    tracing::info!("Parla - 听力练习音频生成");
    print_config(&config);

    tokio::fs::create_dir_all(&config.storage.cache_dir).await?;
    tokio::fs::create_dir_all(&config.storage.temp_dir).await?;

    let tts_engine = build_tts_engine(&config).await?;

    let synthesizer = SegmentSynthesizer::new(
        tts_engine.clone(),
        SynthesizerConfig {
            language_code: config.tts.language_code.clone(),
            output_format: config.tts.output_format,
            min_audio_bytes: config.tts.min_audio_bytes,
            timeout: Duration::from_secs(config.tts.timeout_secs),
            temp_dir: config.storage.temp_dir.clone(),
        },
    );

    let muxer = Arc::new(FfmpegMuxer::new(FfmpegMuxerConfig {
        ffmpeg_path: config.audio.ffmpeg_path.clone(),
        timeout_secs: config.audio.timeout_secs,
    }));
    let assembler = AudioAssembler::new(
        muxer,
        AssemblerConfig {
            sample_rate: config.audio.sample_rate,
            channels: config.audio.channels,
            bitrate: config.audio.bitrate.clone(),
        },
    );

    let parser = DialogueParser::new(&ParserConfig {
        known_speakers: config.parser.known_speakers.clone(),
    });

    let handler = GenerateAudioHandler::new(
        parser,
        synthesizer,
        assembler,
        GenerateAudioConfig {
            cache_dir: config.storage.cache_dir.clone(),
            default_engine: config.tts.engine,
            output_format: config.tts.output_format,
            reuse_cached: config.audio.reuse_cached,
        },
    );

    let state = AppState::new(
        Arc::new(handler),
        tts_engine,
        config.server.public_base_url(),
    );
    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

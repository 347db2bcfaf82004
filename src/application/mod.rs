//! Application Layer - 应用层
//!
//! - commands: 生成练习音频（编排入口）
//! - pipeline: 片段合成、拼接与调用上下文
//! - ports: TTS 引擎与拼接进程的出站端口
//! - error: 分阶段的生成错误

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;

pub use commands::handlers::{GenerateAudioConfig, GenerateAudioHandler};
pub use commands::{AudioArtifact, GenerateAudioCommand};
pub use error::GenerationError;
pub use pipeline::{
    AssembledAudio, AssemblerConfig, AssemblyError, AudioAssembler, GenerationContext,
    GenerationStage, SegmentArtifact, SegmentJob, SegmentSynthesizer, SynthesisError,
    SynthesizerConfig,
};
pub use ports::{
    AudioFormat, AudioMuxerPort, MuxError, MuxTarget, SynthesisRequest, SynthesisResponse,
    TextType, TtsEnginePort, TtsError,
};

//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_muxer;
mod tts_engine;

pub use audio_muxer::{AudioMuxerPort, MuxError, MuxTarget};
pub use tts_engine::{
    AudioFormat, SynthesisRequest, SynthesisResponse, TextType, TtsEnginePort, TtsError,
};

//! Muxer Adapter - 音频拼接实现

mod fake_muxer;
mod ffmpeg_muxer;

pub use fake_muxer::FakeAudioMuxer;
pub use ffmpeg_muxer::{FfmpegMuxer, FfmpegMuxerConfig};

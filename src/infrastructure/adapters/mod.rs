//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod muxer;
pub mod tts;

pub use muxer::*;
pub use tts::*;

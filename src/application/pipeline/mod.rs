//! Audio Pipeline - 合成与拼接
//!
//! - segment_synthesizer: 单段 TTS 合成 → 临时文件
//! - audio_assembler: 校验、拼接、清理
//! - context: 单次调用上下文与合成计划

mod audio_assembler;
mod context;
mod segment_synthesizer;

pub use audio_assembler::{AssembledAudio, AssemblerConfig, AssemblyError, AudioAssembler};
pub use context::{GenerationContext, GenerationStage, INTRODUCTION_LABEL, QUESTION_LABEL};
pub use segment_synthesizer::{
    build_markup, normalize_text, SegmentArtifact, SegmentJob, SegmentSynthesizer,
    SynthesisError, SynthesizerConfig, DEFAULT_MIN_AUDIO_BYTES,
};

//! 应用层错误定义
//!
//! 生成调用的分阶段结果：调用方可以区分“没有可合成的内容”和“外部服务/进程不可用”

use thiserror::Error;

use crate::application::pipeline::{AssemblyError, GenerationStage};
use crate::domain::voice::VoiceError;
use crate::domain::ParseError;

/// 音频生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 练习记录缺少必填字段
    #[error("Invalid exercise: {0}")]
    InvalidExercise(String),

    /// 对话解析不出任何轮次
    #[error("Dialogue parse failed: {0}")]
    Parse(#[from] ParseError),

    /// 说话人缺少音色
    #[error("Voice assignment failed: {0}")]
    Voice(#[from] VoiceError),

    /// 所有片段都合成失败
    #[error("No audio segments were synthesized ({failed} failed)")]
    NoSegments { failed: usize },

    /// 外部拼接失败
    #[error("Audio assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
}

impl GenerationError {
    pub fn invalid_exercise(message: impl Into<String>) -> Self {
        Self::InvalidExercise(message.into())
    }

    /// 失败发生的阶段
    pub fn stage(&self) -> GenerationStage {
        match self {
            Self::InvalidExercise(_) => GenerationStage::Init,
            Self::Parse(_) | Self::Voice(_) => GenerationStage::Conversation,
            Self::NoSegments { .. } | Self::Assembly(_) => GenerationStage::Assemble,
        }
    }

    /// 错误源自输入内容（而非外部依赖）
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidExercise(_) | Self::Parse(_) | Self::Voice(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stage_and_kind() {
        let err = GenerationError::from(ParseError::NoTurns { lines: 2 });
        assert_eq!(err.stage(), GenerationStage::Conversation);
        assert!(err.is_content_error());

        let err = GenerationError::from(AssemblyError::NoSegments);
        assert_eq!(err.stage(), GenerationStage::Assemble);
        assert!(!err.is_content_error());
    }
}

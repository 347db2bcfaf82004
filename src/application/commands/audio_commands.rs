//! Audio Commands - 听力音频生成命令

use std::path::PathBuf;

use crate::domain::{EngineTier, ExerciseRecord};

/// 生成练习音频命令
#[derive(Debug, Clone)]
pub struct GenerateAudioCommand {
    pub record: ExerciseRecord,
    /// 本次调用使用的引擎档位，None 表示使用配置的默认档位
    pub engine: Option<EngineTier>,
}

impl GenerateAudioCommand {
    pub fn new(record: ExerciseRecord) -> Self {
        Self {
            record,
            engine: None,
        }
    }

    pub fn with_engine(mut self, engine: EngineTier) -> Self {
        self.engine = Some(engine);
        self
    }
}

/// 最终音频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// 由内容哈希决定的确定性路径
    pub path: PathBuf,
    pub engine: EngineTier,
    /// 参与拼接的片段数
    pub segment_count: usize,
    /// 合成失败被跳过的片段数
    pub failed_segments: usize,
    /// 拼接前校验未通过的片段数
    pub dropped_segments: usize,
    /// 命中缓存，未重新合成
    pub cached: bool,
}

impl AudioArtifact {
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

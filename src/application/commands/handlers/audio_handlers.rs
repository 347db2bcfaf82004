//! Audio Command Handlers - 练习音频生成编排
//!
//! INIT → INTRO → CONVERSATION → QUESTION → ASSEMBLE → DONE | FAILED
//!
//! 每次调用独立：解析、角色识别、音色分配都在调用内完成，
//! 合成严格按计划顺序串行执行。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::application::commands::audio_commands::*;
use crate::application::error::GenerationError;
use crate::application::pipeline::{
    AssemblyError, AudioAssembler, GenerationContext, GenerationStage, SegmentJob,
    SegmentSynthesizer, INTRODUCTION_LABEL, QUESTION_LABEL,
};
use crate::application::ports::AudioFormat;
use crate::domain::exercise::OPTION_LETTERS;
use crate::domain::{DialogueParser, EngineTier, ExerciseRecord};

/// 生成配置
#[derive(Debug, Clone)]
pub struct GenerateAudioConfig {
    /// 最终音频目录
    pub cache_dir: PathBuf,
    /// 默认引擎档位
    pub default_engine: EngineTier,
    /// 输出格式（决定最终文件扩展名）
    pub output_format: AudioFormat,
    /// 已存在的同内容音频直接复用
    pub reuse_cached: bool,
}

impl Default for GenerateAudioConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data/audio_cache"),
            default_engine: EngineTier::Standard,
            output_format: AudioFormat::Mp3,
            reuse_cached: true,
        }
    }
}

/// GenerateAudio Handler - 练习音频生成
pub struct GenerateAudioHandler {
    parser: DialogueParser,
    synthesizer: SegmentSynthesizer,
    assembler: AudioAssembler,
    config: GenerateAudioConfig,
    /// 同一内容哈希的生成串行执行
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GenerateAudioHandler {
    pub fn new(
        parser: DialogueParser,
        synthesizer: SegmentSynthesizer,
        assembler: AudioAssembler,
        config: GenerateAudioConfig,
    ) -> Self {
        Self {
            parser,
            synthesizer,
            assembler,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &GenerateAudioConfig {
        &self.config
    }

    /// 练习对应的确定性输出路径
    pub fn output_path(&self, record: &ExerciseRecord) -> PathBuf {
        self.config
            .cache_dir
            .join(record.artifact_file_name(self.config.output_format.extension()))
    }

    pub async fn handle(
        &self,
        cmd: GenerateAudioCommand,
    ) -> Result<AudioArtifact, GenerationError> {
        let engine = cmd.engine.unwrap_or(self.config.default_engine);
        let hash = cmd.record.content_hash();
        let span = tracing::info_span!("generate_audio", hash = %hash, engine = %engine);

        async move {
            let result = self.run(&cmd.record, engine, &hash).await;
            match &result {
                Ok(artifact) => tracing::info!(
                    stage = %GenerationStage::Done,
                    path = %artifact.path.display(),
                    segments = artifact.segment_count,
                    cached = artifact.cached,
                    "Audio generation finished"
                ),
                Err(e) => tracing::error!(
                    stage = %GenerationStage::Failed,
                    failed_at = %e.stage(),
                    error = %e,
                    "Audio generation failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        record: &ExerciseRecord,
        engine: EngineTier,
        hash: &str,
    ) -> Result<AudioArtifact, GenerationError> {
        tracing::info!(stage = %GenerationStage::Init, "Starting audio generation");
        validate(record)?;

        let output_path = self.output_path(record);
        let lock = self.locks.entry(hash.to_string()).or_default().clone();

        let result = {
            let _guard = lock.lock().await;
            self.generate_locked(record, engine, &output_path).await
        };

        drop(lock);
        self.locks.remove_if(hash, |_, l| Arc::strong_count(l) == 1);

        result
    }

    async fn generate_locked(
        &self,
        record: &ExerciseRecord,
        engine: EngineTier,
        output_path: &Path,
    ) -> Result<AudioArtifact, GenerationError> {
        if self.config.reuse_cached && is_non_empty_file(output_path).await {
            tracing::info!(path = %output_path.display(), "Reusing cached audio");
            return Ok(AudioArtifact {
                path: output_path.to_path_buf(),
                engine,
                segment_count: 0,
                failed_segments: 0,
                dropped_segments: 0,
                cached: true,
            });
        }

        // 任何合成之前完成解析与音色分配
        let turns = self.parser.parse(&record.conversation)?;
        tracing::info!(
            stage = %GenerationStage::Conversation,
            turns = turns.len(),
            "Parsed dialogue"
        );

        let context = GenerationContext::new(engine, &turns);
        let jobs = context.plan(record, &turns)?;

        let mut segments = Vec::with_capacity(jobs.len());
        let mut failed = 0;
        for job in &jobs {
            tracing::info!(
                stage = %stage_of(job),
                ordinal = job.ordinal,
                total = jobs.len(),
                speaker = %job.speaker,
                voice = %job.voice_id,
                "Synthesizing segment"
            );
            match self.synthesizer.synthesize(job, context.tier()).await {
                Ok(segment) => segments.push(segment),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        ordinal = job.ordinal,
                        speaker = %job.speaker,
                        error = %e,
                        "Segment synthesis failed, skipping"
                    );
                }
            }
        }

        if segments.is_empty() {
            return Err(GenerationError::NoSegments { failed });
        }

        tracing::info!(
            stage = %GenerationStage::Assemble,
            segments = segments.len(),
            failed,
            "Combining audio segments"
        );

        tokio::fs::create_dir_all(&self.config.cache_dir)
            .await
            .map_err(|e| AssemblyError::IoError(e.to_string()))?;

        let assembled = self.assembler.assemble(segments, output_path).await?;

        Ok(AudioArtifact {
            path: assembled.path,
            engine,
            segment_count: assembled.segment_count,
            failed_segments: failed,
            dropped_segments: assembled.dropped,
            cached: false,
        })
    }
}

fn validate(record: &ExerciseRecord) -> Result<(), GenerationError> {
    if record.conversation.trim().is_empty() {
        return Err(GenerationError::invalid_exercise("conversation is empty"));
    }
    if record.question.trim().is_empty() {
        return Err(GenerationError::invalid_exercise("question is empty"));
    }
    if record.options.len() > OPTION_LETTERS.len() {
        return Err(GenerationError::invalid_exercise(format!(
            "too many options: {} (maximum {})",
            record.options.len(),
            OPTION_LETTERS.len()
        )));
    }
    Ok(())
}

fn stage_of(job: &SegmentJob) -> GenerationStage {
    match job.speaker.as_str() {
        INTRODUCTION_LABEL if job.ordinal == 0 => GenerationStage::Intro,
        QUESTION_LABEL => GenerationStage::Question,
        _ => GenerationStage::Conversation,
    }
}

async fn is_non_empty_file(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(meta) if meta.is_file() && meta.len() > 0)
}

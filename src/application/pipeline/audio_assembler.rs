//! Audio Assembler - 片段校验、拼接与清理
//!
//! 输入片段无论拼接成功还是失败都会被释放

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;
use thiserror::Error;

use crate::application::ports::{AudioMuxerPort, MuxError, MuxTarget};

use super::segment_synthesizer::SegmentArtifact;

/// 拼接错误（致命）
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("No audio segments to assemble")]
    NoSegments,

    #[error("No valid audio segments ({dropped} dropped)")]
    NoValidSegments { dropped: usize },

    #[error("Muxer failed: {0}")]
    Mux(#[from] MuxError),

    #[error("Output file is empty or missing: {0}")]
    OutputMissing(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 拼接配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    pub sample_rate: u32,
    pub channels: u8,
    pub bitrate: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            channels: 1,
            bitrate: "192k".to_string(),
        }
    }
}

/// 拼接结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledAudio {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// 参与拼接的片段数
    pub segment_count: usize,
    /// 校验未通过被丢弃的片段数
    pub dropped: usize,
}

/// 音频拼接器
pub struct AudioAssembler {
    muxer: Arc<dyn AudioMuxerPort>,
    config: AssemblerConfig,
}

impl AudioAssembler {
    pub fn new(muxer: Arc<dyn AudioMuxerPort>, config: AssemblerConfig) -> Self {
        Self { muxer, config }
    }

    /// 按顺序拼接片段到 `output_path`
    ///
    /// 空列表直接失败，不会调用外部进程
    pub async fn assemble(
        &self,
        segments: Vec<SegmentArtifact>,
        output_path: &Path,
    ) -> Result<AssembledAudio, AssemblyError> {
        if segments.is_empty() {
            return Err(AssemblyError::NoSegments);
        }

        let total = segments.len();
        let mut valid = Vec::with_capacity(total);
        for segment in segments {
            match tokio::fs::metadata(segment.file_path()).await {
                Ok(meta) if meta.len() > 0 => {
                    tracing::debug!(
                        ordinal = segment.ordinal,
                        size_bytes = meta.len(),
                        "Valid audio segment"
                    );
                    valid.push(segment);
                }
                _ => {
                    tracing::warn!(
                        ordinal = segment.ordinal,
                        path = %segment.file_path().display(),
                        "Invalid audio segment, skipping"
                    );
                }
            }
        }

        let dropped = total - valid.len();
        tracing::info!(valid = valid.len(), dropped, "Validated audio segments");

        if valid.is_empty() {
            return Err(AssemblyError::NoValidSegments { dropped });
        }

        let inputs: Vec<PathBuf> = valid.iter().map(|s| s.file_path().to_path_buf()).collect();
        let result = match create_staging(output_path) {
            Ok(staging) => self.mux_and_publish(&inputs, staging, output_path).await,
            Err(e) => Err(e),
        };

        release_segments(valid);
        let size_bytes = result?;
        tracing::info!(
            path = %output_path.display(),
            size_bytes,
            segments = inputs.len(),
            "Combined audio created"
        );

        Ok(AssembledAudio {
            path: output_path.to_path_buf(),
            size_bytes,
            segment_count: inputs.len(),
            dropped,
        })
    }

    /// 拼接到暂存文件，成功后改名为最终文件
    ///
    /// 暂存文件由 [`TempPath`] 持有：失败或 future 被取消时都会被删除
    async fn mux_and_publish(
        &self,
        inputs: &[PathBuf],
        staging: TempPath,
        output_path: &Path,
    ) -> Result<u64, AssemblyError> {
        let target = MuxTarget {
            output_path: staging.to_path_buf(),
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
            bitrate: self.config.bitrate.clone(),
        };

        let outcome = match self.muxer.concat(inputs, &target).await {
            Ok(()) => match tokio::fs::metadata(&target.output_path).await {
                Ok(meta) if meta.len() > 0 => Ok(meta.len()),
                _ => Err(AssemblyError::OutputMissing(target.output_path.clone())),
            },
            Err(e) => Err(AssemblyError::Mux(e)),
        };

        let size = match outcome {
            Ok(size) => size,
            Err(e) => {
                discard_staging(staging);
                return Err(e);
            }
        };

        // 同名覆盖是幂等的
        staging
            .persist(output_path)
            .map_err(|e| AssemblyError::IoError(e.error.to_string()))?;

        Ok(size)
    }
}

/// 在最终文件同目录创建唯一的暂存文件，扩展名保持不变
fn create_staging(output_path: &Path) -> Result<TempPath, AssemblyError> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    let suffix = output_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(&suffix)
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| AssemblyError::IoError(format!("Failed to create staging file: {}", e)))
}

fn discard_staging(staging: TempPath) {
    let path = staging.to_path_buf();
    if let Err(e) = staging.close() {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to delete staging file"
        );
    }
}

fn release_segments(segments: Vec<SegmentArtifact>) {
    for segment in segments {
        let path = segment.file_path().to_path_buf();
        match segment.release() {
            Ok(()) => tracing::debug!(path = %path.display(), "Cleaned up temporary file"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to delete temporary file"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeAudioMuxer;

    fn segment(dir: &Path, ordinal: usize, content: &[u8]) -> SegmentArtifact {
        let path = tempfile::Builder::new()
            .prefix("segment_")
            .suffix(".mp3")
            .tempfile_in(dir)
            .unwrap()
            .into_temp_path();
        std::fs::write(&path, content).unwrap();
        SegmentArtifact::new(ordinal, "Turista", "Enrique", content.len() as u64, path)
    }

    fn assembler(muxer: Arc<FakeAudioMuxer>) -> AudioAssembler {
        AudioAssembler::new(muxer, AssemblerConfig::default())
    }

    #[tokio::test]
    async fn test_empty_segments_fail_without_muxer() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::new());

        let result = assembler(muxer.clone())
            .assemble(Vec::new(), &dir.path().join("out.mp3"))
            .await;

        assert!(matches!(result, Err(AssemblyError::NoSegments)));
        assert_eq!(muxer.calls(), 0);
    }

    #[tokio::test]
    async fn test_concatenates_in_order_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::new());
        let segments = vec![
            segment(dir.path(), 0, b"intro-"),
            segment(dir.path(), 1, b"turn-"),
            segment(dir.path(), 2, b"question"),
        ];
        let inputs: Vec<PathBuf> = segments.iter().map(|s| s.file_path().to_path_buf()).collect();
        let output = dir.path().join("out.mp3");

        let assembled = assembler(muxer.clone()).assemble(segments, &output).await.unwrap();

        assert_eq!(assembled.segment_count, 3);
        assert_eq!(assembled.dropped, 0);
        assert_eq!(std::fs::read(&output).unwrap(), b"intro-turn-question");
        assert!(inputs.iter().all(|p| !p.exists()));
        assert_eq!(muxer.calls(), 1);

        let target = muxer.last_target().unwrap();
        assert_eq!(target.sample_rate, 24000);
        assert_eq!(target.channels, 1);
        assert_eq!(target.bitrate, "192k");
        assert_ne!(target.output_path, output);
    }

    #[tokio::test]
    async fn test_empty_files_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::new());
        let segments = vec![segment(dir.path(), 0, b""), segment(dir.path(), 1, b"audio")];
        let output = dir.path().join("out.mp3");

        let assembled = assembler(muxer).assemble(segments, &output).await.unwrap();

        assert_eq!(assembled.segment_count, 1);
        assert_eq!(assembled.dropped, 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_all_invalid_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::new());
        let segments = vec![segment(dir.path(), 0, b"")];

        let result = assembler(muxer.clone())
            .assemble(segments, &dir.path().join("out.mp3"))
            .await;

        assert!(matches!(result, Err(AssemblyError::NoValidSegments { dropped: 1 })));
        assert_eq!(muxer.calls(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_muxer_failure_still_releases_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::failing());
        let segments = vec![segment(dir.path(), 0, b"a"), segment(dir.path(), 1, b"b")];
        let output = dir.path().join("out.mp3");

        let result = assembler(muxer).assemble(segments, &output).await;

        assert!(matches!(result, Err(AssemblyError::Mux(_))));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staging_file_sits_next_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let staging = create_staging(&dir.path().join("question_abc.mp3")).unwrap();

        assert_eq!(staging.parent(), Some(dir.path()));
        assert_eq!(staging.extension().unwrap(), "mp3");
        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".question_abc."));

        let path = staging.to_path_buf();
        drop(staging);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cancelled_assembly_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Arc::new(FakeAudioMuxer::hanging());
        let segments = vec![segment(dir.path(), 0, b"a"), segment(dir.path(), 1, b"b")];
        let output = dir.path().join("out.mp3");

        let assembler = assembler(muxer.clone());
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            assembler.assemble(segments, &output),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(muxer.calls(), 1);
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

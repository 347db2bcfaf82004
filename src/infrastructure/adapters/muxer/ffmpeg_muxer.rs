//! Ffmpeg Muxer - 调用 ffmpeg 拼接音频片段
//!
//! 使用 concat filter 将多个输入按顺序合并为一个输出，
//! 同时统一采样率、声道数和比特率

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{AudioMuxerPort, MuxError, MuxTarget};

/// stderr 在错误信息中保留的最大长度
const STDERR_TAIL: usize = 2000;

/// Ffmpeg 配置
#[derive(Debug, Clone)]
pub struct FfmpegMuxerConfig {
    /// ffmpeg 可执行文件路径
    pub ffmpeg_path: PathBuf,
    /// 单次拼接超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for FfmpegMuxerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout_secs: 120,
        }
    }
}

/// ffmpeg 拼接器
pub struct FfmpegMuxer {
    config: FfmpegMuxerConfig,
}

impl FfmpegMuxer {
    pub fn new(config: FfmpegMuxerConfig) -> Self {
        Self { config }
    }

    /// 构造 ffmpeg 参数
    ///
    /// `-y -i a -i b -filter_complex "[0:a][1:a]concat=n=2:v=0:a=1[out]"`
    /// `-map [out] -ar .. -ac .. -b:a .. out`
    pub fn build_args(inputs: &[PathBuf], target: &MuxTarget) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        for input in inputs {
            args.push("-i".into());
            args.push(input.as_os_str().to_owned());
        }

        let streams: String = (0..inputs.len()).map(|i| format!("[{}:a]", i)).collect();
        let filter = format!("{}concat=n={}:v=0:a=1[out]", streams, inputs.len());

        args.push("-filter_complex".into());
        args.push(filter.into());
        args.push("-map".into());
        args.push("[out]".into());
        args.push("-ar".into());
        args.push(target.sample_rate.to_string().into());
        args.push("-ac".into());
        args.push(target.channels.to_string().into());
        args.push("-b:a".into());
        args.push(target.bitrate.clone().into());
        args.push(target.output_path.as_os_str().to_owned());
        args
    }
}

fn tail(text: &str) -> String {
    let trimmed = text.trim();
    let mut start = trimmed.len().saturating_sub(STDERR_TAIL);
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    trimmed[start..].to_string()
}

#[async_trait]
impl AudioMuxerPort for FfmpegMuxer {
    async fn concat(&self, inputs: &[PathBuf], target: &MuxTarget) -> Result<(), MuxError> {
        let args = Self::build_args(inputs, target);

        tracing::debug!(
            ffmpeg = %self.config.ffmpeg_path.display(),
            inputs = inputs.len(),
            output = %target.output_path.display(),
            "Running ffmpeg concat"
        );

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MuxError::Spawn(format!("{}: {}", self.config.ffmpeg_path.display(), e)))?;

        // 超时后 future 被丢弃，kill_on_drop 负责终止子进程
        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(timeout_secs = self.config.timeout_secs, "ffmpeg timed out, killed");
            MuxError::Timeout(self.config.timeout_secs)
        })?
        .map_err(|e| MuxError::IoError(e.to_string()))?;

        if !output.status.success() {
            let stderr = tail(&String::from_utf8_lossy(&output.stderr));
            tracing::error!(status = %output.status, stderr = %stderr, "ffmpeg failed");
            return Err(MuxError::ProcessFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> MuxTarget {
        MuxTarget {
            output_path: PathBuf::from("/cache/out.mp3"),
            sample_rate: 24000,
            channels: 1,
            bitrate: "192k".into(),
        }
    }

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_build_args_three_inputs() {
        let inputs = vec![
            PathBuf::from("/tmp/a.mp3"),
            PathBuf::from("/tmp/b.mp3"),
            PathBuf::from("/tmp/c.mp3"),
        ];
        let args = as_strings(FfmpegMuxer::build_args(&inputs, &target()));

        assert_eq!(
            args,
            vec![
                "-y", "-i", "/tmp/a.mp3", "-i", "/tmp/b.mp3", "-i", "/tmp/c.mp3",
                "-filter_complex", "[0:a][1:a][2:a]concat=n=3:v=0:a=1[out]",
                "-map", "[out]", "-ar", "24000", "-ac", "1", "-b:a", "192k",
                "/cache/out.mp3",
            ]
        );
    }

    #[test]
    fn test_build_args_single_input() {
        let args = as_strings(FfmpegMuxer::build_args(&[PathBuf::from("x.mp3")], &target()));
        assert!(args.contains(&"[0:a]concat=n=1:v=0:a=1[out]".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/cache/out.mp3"));
    }

    #[test]
    fn test_tail_keeps_end() {
        let long = "x".repeat(STDERR_TAIL + 10) + "END";
        let t = tail(&long);
        assert_eq!(t.len(), STDERR_TAIL);
        assert!(t.ends_with("END"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_process_failure() {
        let muxer = FfmpegMuxer::new(FfmpegMuxerConfig {
            ffmpeg_path: PathBuf::from("false"),
            timeout_secs: 5,
        });
        let result = muxer.concat(&[PathBuf::from("a.mp3")], &target()).await;
        assert!(matches!(result, Err(MuxError::ProcessFailed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_is_kept_on_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'Invalid data found' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let muxer = FfmpegMuxer::new(FfmpegMuxerConfig {
            ffmpeg_path: script,
            timeout_secs: 5,
        });
        match muxer.concat(&[PathBuf::from("a.mp3")], &target()).await {
            Err(MuxError::ProcessFailed { stderr, .. }) => {
                assert_eq!(stderr, "Invalid data found")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_process_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("hang.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let muxer = FfmpegMuxer::new(FfmpegMuxerConfig {
            ffmpeg_path: script,
            timeout_secs: 1,
        });
        let started = std::time::Instant::now();
        let result = muxer.concat(&[PathBuf::from("a.mp3")], &target()).await;

        assert!(matches!(result, Err(MuxError::Timeout(1))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let muxer = FfmpegMuxer::new(FfmpegMuxerConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg-binary"),
            timeout_secs: 5,
        });
        let result = muxer.concat(&[PathBuf::from("a.mp3")], &target()).await;
        assert!(matches!(result, Err(MuxError::Spawn(_))));
    }
}

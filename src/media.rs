//! Media post-processing
//!
//! Best-effort stage that runs after inference: copying the source clip's
//! audio onto the generated video. Failures degrade to a video-only result
//! instead of failing the request.

use crate::error::{VramslotError, VramslotResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

/// Clips longer than this are truncated before padding
pub const MAX_FRAMES: usize = 121;

/// Frame count a clip is padded to for a given sequence-parallel size
///
/// Models consume `4 * sp_size * k + 1` frames. Clips are truncated to
/// [`MAX_FRAMES`], then padded (by repeating the last frame) up to the next
/// valid length, with at least one full group.
pub fn padded_frame_count(total: usize, sp_size: usize) -> usize {
    let total = total.min(MAX_FRAMES);
    let group = 4 * sp_size.max(1);

    if total <= group {
        return group + 1;
    }
    match (total - 1) % group {
        0 => total,
        rem => total + (group - rem),
    }
}

/// Find an executable on `PATH`
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Audio passthrough using ffmpeg
#[derive(Debug, Clone)]
pub struct Muxer {
    ffmpeg: Option<PathBuf>,
}

impl Muxer {
    /// Use whatever `ffmpeg` is on `PATH`, if any
    pub fn detect() -> Self {
        Self {
            ffmpeg: find_on_path("ffmpeg"),
        }
    }

    /// Use an explicit ffmpeg binary, or none
    pub fn with_ffmpeg(ffmpeg: Option<PathBuf>) -> Self {
        Self { ffmpeg }
    }

    /// Copy the audio of `source` onto `video_only`, writing `output`
    ///
    /// Falls back to renaming `video_only` to `output` when ffmpeg is missing
    /// or fails. Only that final rename can return an error.
    pub async fn mux_audio_stream(
        &self,
        source: &Path,
        video_only: &Path,
        output: &Path,
    ) -> VramslotResult<PathBuf> {
        let Some(ffmpeg) = self.ffmpeg.as_deref() else {
            warn!("ffmpeg missing; returning video without audio passthrough");
            return replace(video_only, output).await;
        };

        let args = mux_args(source, video_only, output);
        debug!("Running {} {}", ffmpeg.display(), args.join(" "));

        let result = Command::new(ffmpeg)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => {
                if let Err(e) = fs::remove_file(video_only).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove {}: {}", video_only.display(), e);
                    }
                }
                Ok(output.to_path_buf())
            }
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                warn!("Audio mux failed, returning video-only result");
                if !stderr.trim().is_empty() {
                    warn!("{}", stderr.trim());
                }
                replace(video_only, output).await
            }
            Err(e) => {
                warn!("Audio mux could not start ({}), returning video-only result", e);
                replace(video_only, output).await
            }
        }
    }
}

fn mux_args(source: &Path, video_only: &Path, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = ["-loglevel", "error", "-y", "-i"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(video_only.display().to_string());
    args.push("-i".to_string());
    args.push(source.display().to_string());
    args.extend(
        [
            "-c:v", "copy", "-c:a", "copy", "-map", "0:v:0", "-map", "1:a:0?", "-shortest",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(output.display().to_string());
    args
}

async fn replace(from: &Path, to: &Path) -> VramslotResult<PathBuf> {
    fs::rename(from, to).await.map_err(|e| {
        VramslotError::io(
            format!("moving {} to {}", from.display(), to.display()),
            e,
        )
    })?;
    Ok(to.to_path_buf())
}

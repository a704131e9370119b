//! Artifact downloads through the external `pget` tool

use crate::error::{VramslotError, VramslotResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Fetches a single remote artifact to local storage
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, dest: &Path) -> VramslotResult<()>;
}

/// Build the `pget` invocation for `url` → `dest`
///
/// Archives are extracted in place: `-x` is added and the target becomes the
/// archive's parent directory.
pub fn download_command(url: &str, dest: &Path) -> Vec<String> {
    let is_archive = dest.extension().is_some_and(|ext| ext == "tar");
    let target: PathBuf = if is_archive {
        dest.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        dest.to_path_buf()
    };
    let flags = if is_archive { "-vfx" } else { "-vf" };

    vec![
        flags.to_string(),
        url.to_string(),
        target.display().to_string(),
    ]
}

/// Downloader backed by the `pget` binary
#[derive(Debug, Clone)]
pub struct PgetDownloader {
    program: String,
}

impl PgetDownloader {
    pub fn new() -> Self {
        Self {
            program: "pget".to_string(),
        }
    }

    /// Use a different executable with the same interface
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PgetDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for PgetDownloader {
    async fn download(&self, url: &str, dest: &Path) -> VramslotResult<()> {
        let args = download_command(url, dest);
        let command_line = format!("{} {}", self.program, args.join(" "));
        info!("Downloading {} to {}", url, dest.display());
        debug!("Running command: {}", command_line);

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| VramslotError::command_failed(&command_line, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VramslotError::FetchFailed {
                artifact: url.to_string(),
                reason: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        info!(
            "Download of {} completed in {:.1}s",
            url,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_command() {
        let args = download_command(
            "https://cdn.example/version.txt",
            Path::new("/cache/version.txt"),
        );
        assert_eq!(
            args,
            vec!["-vf", "https://cdn.example/version.txt", "/cache/version.txt"]
        );
    }

    #[test]
    fn archive_extracts_into_parent() {
        let args = download_command(
            "https://cdn.example/weights.tar",
            Path::new("/cache/weights.tar"),
        );
        assert_eq!(args, vec!["-vfx", "https://cdn.example/weights.tar", "/cache"]);
    }

    #[tokio::test]
    async fn missing_program_is_command_failure() {
        let downloader = PgetDownloader::with_program("vramslot-no-such-downloader");
        let err = downloader
            .download("https://cdn.example/a", Path::new("/tmp/a"))
            .await
            .unwrap_err();
        assert!(matches!(err, VramslotError::CommandFailed { .. }));
    }
}

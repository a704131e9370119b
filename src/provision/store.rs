//! Local artifact store

use crate::config::schema::CacheConfig;
use crate::error::{VramslotError, VramslotResult};
use crate::provision::fetch::Downloader;
use crate::provision::ArtifactResolver;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Directory-backed artifact cache
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
    weights_dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store without touching the filesystem
    pub fn open(base_dir: impl Into<PathBuf>, weights_subdir: &str) -> Self {
        let base_dir = base_dir.into();
        let weights_dir = base_dir.join(weights_subdir);
        Self {
            base_dir,
            weights_dir,
        }
    }

    /// Open a store as described by configuration, resolving a relative
    /// `base_dir` against `config_dir`
    pub fn from_config(config: &CacheConfig, config_dir: &Path) -> Self {
        let base_dir = if config.base_dir.is_absolute() {
            config.base_dir.clone()
        } else {
            config_dir.join(&config.base_dir)
        };
        Self::open(base_dir, &config.weights_subdir)
    }

    /// Create the cache directories and return the store
    pub async fn init(base_dir: impl Into<PathBuf>, weights_subdir: &str) -> VramslotResult<Self> {
        let store = Self::open(base_dir, weights_subdir);
        store.ensure_dirs().await?;
        Ok(store)
    }

    /// Create the cache directories if missing
    pub async fn ensure_dirs(&self) -> VramslotResult<()> {
        for dir in [&self.base_dir, &self.weights_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                VramslotError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }
        debug!("Artifact cache ready at {}", self.base_dir.display());
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn weights_dir(&self) -> &Path {
        &self.weights_dir
    }

    /// Whether an artifact is already available locally
    ///
    /// Archives count as present once their extracted directory exists.
    pub fn is_present(&self, artifact: &str) -> bool {
        match artifact.strip_suffix(".tar") {
            Some(extracted) => self.base_dir.join(extracted).exists(),
            None => self.base_dir.join(artifact).exists(),
        }
    }

    /// Artifacts from `artifacts` that are not available locally
    pub fn missing<'a>(&self, artifacts: &'a [String]) -> Vec<&'a str> {
        artifacts
            .iter()
            .map(String::as_str)
            .filter(|a| !self.is_present(a))
            .collect()
    }

    /// Fetch every missing artifact (or all of them with `force`)
    ///
    /// Returns the artifacts that were fetched.
    pub async fn ensure(
        &self,
        downloader: &dyn Downloader,
        base_url: &str,
        artifacts: &[String],
        force: bool,
    ) -> VramslotResult<Vec<String>> {
        self.ensure_dirs().await?;

        let mut fetched = Vec::new();
        for artifact in artifacts {
            if !force && self.is_present(artifact) {
                debug!("Artifact {} already present", artifact);
                continue;
            }

            let url = format!("{}{}", base_url, artifact);
            let dest = self.base_dir.join(artifact);
            downloader.download(&url, &dest).await?;
            info!("Fetched {}", artifact);
            fetched.push(artifact.clone());
        }

        Ok(fetched)
    }
}

impl ArtifactResolver for ArtifactStore {
    fn resolve(&self, filename: &str) -> VramslotResult<PathBuf> {
        let path = self.weights_dir.join(filename);
        if !path.exists() {
            return Err(VramslotError::MissingArtifact(path));
        }
        Ok(path)
    }
}

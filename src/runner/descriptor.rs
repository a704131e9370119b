//! Runner descriptors
//!
//! A descriptor is a TOML document describing how a runner is assembled.
//! Sections the manager does not care about are carried through untouched.
//! After loading, the manager forces its normalization policy onto the
//! model section regardless of what the descriptor asked for.

use crate::error::{VramslotError, VramslotResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Normalization forced on every model
pub const NORM: &str = "rms";
/// Normalization forced on the video output head
pub const VID_OUT_NORM: &str = "rms";
/// Text input normalization, only when the model declares the option
pub const TXT_IN_NORM: &str = "layer";
/// Query/key normalization, only when the model declares the option
pub const QK_NORM: &str = "rms";

/// Fully loaded runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Model network settings
    #[serde(default)]
    pub model: ModelSection,

    /// Autoencoder settings
    #[serde(default)]
    pub vae: VaeSection,

    /// Remaining top-level sections
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Model network settings subject to normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    #[serde(default)]
    pub norm: String,

    #[serde(default)]
    pub vid_out_norm: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txt_in_norm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qk_norm: Option<String>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Autoencoder settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaeSection {
    /// Parameters passed to the runner's capacity limiter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<MemoryLimit>,

    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Named accelerator memory caps, e.g. `conv_max_mem = 0.5`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryLimit(pub BTreeMap<String, f64>);

impl MemoryLimit {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }
}

impl RunnerConfig {
    /// Parse a descriptor document
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply the normalization policy
    ///
    /// `norm` and `vid_out_norm` are always overwritten. `txt_in_norm` and
    /// `qk_norm` are only overwritten when the descriptor declares them.
    pub fn normalize(&mut self) {
        let model = &mut self.model;
        model.norm = NORM.to_string();
        model.vid_out_norm = VID_OUT_NORM.to_string();
        if let Some(txt_in_norm) = model.txt_in_norm.as_mut() {
            *txt_in_norm = TXT_IN_NORM.to_string();
        }
        if let Some(qk_norm) = model.qk_norm.as_mut() {
            *qk_norm = QK_NORM.to_string();
        }
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> VramslotResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Loads runner descriptors
#[async_trait]
pub trait DescriptorLoader: Send + Sync {
    async fn load(&self, descriptor: &Path) -> VramslotResult<RunnerConfig>;
}

/// Loads descriptors from TOML files on local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDescriptorLoader;

#[async_trait]
impl DescriptorLoader for TomlDescriptorLoader {
    async fn load(&self, descriptor: &Path) -> VramslotResult<RunnerConfig> {
        let content = fs::read_to_string(descriptor).await.map_err(|e| {
            VramslotError::io(format!("reading descriptor {}", descriptor.display()), e)
        })?;

        let config =
            RunnerConfig::from_toml(&content).map_err(|e| VramslotError::DescriptorInvalid {
                path: descriptor.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Loaded descriptor {}", descriptor.display());
        Ok(config)
    }
}

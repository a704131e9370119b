//! Configuration schema for vramslot
//!
//! Configuration is stored at `~/.config/vramslot/config.toml`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,

    /// Runner manager settings
    pub manager: ManagerConfig,

    /// Variant recipes keyed by variant id
    pub variants: BTreeMap<String, VariantConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
            manager: ManagerConfig::default(),
            variants: default_variants(),
        }
    }
}

fn default_variants() -> BTreeMap<String, VariantConfig> {
    let mut variants = BTreeMap::new();
    variants.insert(
        "3b".to_string(),
        VariantConfig {
            checkpoint: "seedvr2_ema_3b.pth".to_string(),
            descriptor: PathBuf::from("configs/3b.toml"),
        },
    );
    variants.insert(
        "7b".to_string(),
        VariantConfig {
            checkpoint: "seedvr2_ema_7b.pth".to_string(),
            descriptor: PathBuf::from("configs/7b.toml"),
        },
    );
    variants
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Local artifact cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root of the artifact cache
    pub base_dir: PathBuf,

    /// Directory under `base_dir` holding checkpoints
    pub weights_subdir: String,

    /// Remote location artifacts are fetched from
    pub base_url: String,

    /// Artifacts fetched by `vramslot fetch`
    pub artifacts: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("model_cache"),
            weights_subdir: "weights".to_string(),
            base_url: "https://weights.replicate.delivery/default/seedvr2/model_cache/".to_string(),
            artifacts: vec![
                ".cache.tar".to_string(),
                "version.txt".to_string(),
                "weights.tar".to_string(),
                "wheels.tar".to_string(),
                "xet.tar".to_string(),
            ],
        }
    }
}

/// Runner manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Variant made resident at startup
    pub default_variant: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_variant: "3b".to_string(),
        }
    }
}

/// Construction recipe for one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Checkpoint file name inside the weights directory
    pub checkpoint: String,

    /// Runner descriptor (TOML), relative to the config file directory
    pub descriptor: PathBuf,
}

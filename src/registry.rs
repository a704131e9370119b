//! Variant registry
//!
//! Static mapping from variant id to its construction recipe. Built once from
//! configuration and never mutated afterwards.

use crate::config::Config;
use crate::error::{VramslotError, VramslotResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Construction recipe for a single variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    /// Variant id (registry key)
    pub id: String,

    /// Checkpoint file name resolved through the artifact store
    pub checkpoint: String,

    /// Runner descriptor location
    pub descriptor: PathBuf,
}

/// Immutable set of known variants
#[derive(Debug, Clone, Default)]
pub struct VariantRegistry {
    specs: BTreeMap<String, VariantSpec>,
}

impl VariantRegistry {
    /// Build a registry from explicit specs
    pub fn new(specs: impl IntoIterator<Item = VariantSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Build a registry from configuration, resolving relative descriptor
    /// paths against `config_dir`
    pub fn from_config(config: &Config, config_dir: &Path) -> Self {
        Self::new(config.variants.iter().map(|(id, variant)| {
            let descriptor = if variant.descriptor.is_absolute() {
                variant.descriptor.clone()
            } else {
                config_dir.join(&variant.descriptor)
            };
            VariantSpec {
                id: id.clone(),
                checkpoint: variant.checkpoint.clone(),
                descriptor,
            }
        }))
    }

    /// Look up a variant, failing with the list of valid ids
    pub fn lookup(&self, id: &str) -> VramslotResult<&VariantSpec> {
        self.specs
            .get(id)
            .ok_or_else(|| VramslotError::UnknownVariant {
                id: id.to_string(),
                valid: self.ids(),
            })
    }

    /// Valid variant ids in sorted order
    pub fn ids(&self) -> Vec<String> {
        self.specs.keys().cloned().collect()
    }

    /// Iterate over all specs in id order
    pub fn iter(&self) -> impl Iterator<Item = &VariantSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

//! CLI command implementations

pub mod check;
pub mod config;
pub mod describe;
pub mod fetch;
pub mod mux;
pub mod variants;

pub use check::execute as check;
pub use config::execute as config;
pub use describe::execute as describe;
pub use fetch::execute as fetch;
pub use mux::execute as mux;
pub use variants::execute as variants;

use crate::config::{Config, ConfigManager};
use crate::provision::ArtifactStore;
use crate::registry::VariantRegistry;

/// Everything a command needs from the loaded configuration
pub struct Context {
    pub config: Config,
    pub manager: ConfigManager,
}

impl Context {
    pub fn new(config: Config, manager: ConfigManager) -> Self {
        Self { config, manager }
    }

    pub fn registry(&self) -> VariantRegistry {
        VariantRegistry::from_config(&self.config, &self.manager.config_dir())
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::from_config(&self.config.cache, &self.manager.config_dir())
    }
}

//! Runner unit abstraction
//!
//! The manager never looks inside a runner. It only needs to move it between
//! memory tiers, read where it currently lives, and (when the runner offers
//! it) re-apply a capacity limit after a transfer.

use crate::error::VramslotResult;
use crate::registry::VariantSpec;
use crate::runner::descriptor::{MemoryLimit, RunnerConfig};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Physical location of a runner's weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Host memory (spill tier)
    Host,
    /// Accelerator memory (the single fast slot)
    Accelerator,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Accelerator => write!(f, "accelerator"),
        }
    }
}

/// Optional capability: cap working memory used on the accelerator
pub trait CapacityLimiter: Send + Sync {
    fn limit_capacity(&self, limit: &MemoryLimit) -> VramslotResult<()>;
}

/// A constructed, runnable model unit
///
/// Handles are shared: callers keep using a runner after it has been evicted
/// to host memory, it only gets slower.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Move all weights to `location`
    async fn move_to(&self, location: Location) -> VramslotResult<()>;

    /// Where the weights currently live
    fn location(&self) -> Location;

    /// Capacity limiter, if this runner supports one
    fn capacity_limiter(&self) -> Option<&dyn CapacityLimiter> {
        None
    }
}

/// Builds runners from a normalized configuration and a checkpoint
#[async_trait]
pub trait RunnerFactory: Send + Sync {
    /// Construct a runner in host memory
    async fn build(
        &self,
        spec: &VariantSpec,
        config: &RunnerConfig,
        checkpoint: &Path,
    ) -> VramslotResult<Arc<dyn Runner>>;
}

/// The shared accelerator
#[async_trait]
pub trait Device: Send + Sync {
    /// Human-readable device name for logs
    fn name(&self) -> &str;

    /// Return transient cached allocations to the device allocator
    async fn release_cached(&self) -> VramslotResult<()>;
}

//! Per-variant runner state

use crate::runner::descriptor::RunnerConfig;
use crate::runner::unit::Runner;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Where a variant currently lives, from the manager's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Residency {
    /// Never constructed
    Unbuilt,
    /// Constructed, parked in host memory
    Spill,
    /// Occupying the accelerator slot
    Fast,
}

impl fmt::Display for Residency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbuilt => "unbuilt",
            Self::Spill => "spill",
            Self::Fast => "fast",
        };
        write!(f, "{}", name)
    }
}

/// A constructed runner and its bookkeeping
pub(crate) struct RunnerState {
    pub runner: Arc<dyn Runner>,
    pub config: Arc<RunnerConfig>,
    pub residency: Residency,
    pub built_at: DateTime<Utc>,
    pub promotions: u32,
    /// Capacity limit applied since the last transfer to the accelerator
    pub limited: bool,
}

impl RunnerState {
    /// Freshly constructed runners start in host memory
    pub fn new(runner: Arc<dyn Runner>, config: RunnerConfig) -> Self {
        Self {
            runner,
            config: Arc::new(config),
            residency: Residency::Spill,
            built_at: Utc::now(),
            promotions: 0,
            limited: false,
        }
    }

    /// Resident and limited; nothing left to do for a repeated request
    pub fn is_settled(&self) -> bool {
        self.residency == Residency::Fast && self.limited
    }

    pub fn lease(&self, id: &str) -> ActiveRunner {
        ActiveRunner {
            id: id.to_string(),
            runner: Arc::clone(&self.runner),
            config: Arc::clone(&self.config),
        }
    }
}

/// Everything guarded by the manager lock
#[derive(Default)]
pub(crate) struct ManagerState {
    /// Constructed runners; a missing entry means `Unbuilt`
    pub runners: HashMap<String, RunnerState>,
    /// Variant occupying the accelerator slot
    pub active: Option<String>,
}

impl ManagerState {
    pub fn residency(&self, id: &str) -> Residency {
        self.runners
            .get(id)
            .map_or(Residency::Unbuilt, |entry| entry.residency)
    }
}

/// Handle returned by `RunnerManager::use_variant`
///
/// The configuration is an immutable snapshot shared with the manager.
#[derive(Clone)]
pub struct ActiveRunner {
    pub id: String,
    pub runner: Arc<dyn Runner>,
    pub config: Arc<RunnerConfig>,
}

impl ActiveRunner {
    /// Whether both handles point at the same constructed runner
    pub fn same_runner(&self, other: &ActiveRunner) -> bool {
        Arc::ptr_eq(&self.runner, &other.runner)
    }
}

impl fmt::Debug for ActiveRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRunner")
            .field("id", &self.id)
            .field("location", &self.runner.location())
            .finish()
    }
}

/// Point-in-time view of one variant
#[derive(Debug, Clone, Serialize)]
pub struct RunnerStatus {
    pub id: String,
    pub residency: Residency,
    pub built_at: Option<DateTime<Utc>>,
    pub promotions: u32,
}

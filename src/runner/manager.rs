//! Single-slot runner manager
//!
//! Owns every constructed runner for the lifetime of the process and keeps at
//! most one of them on the accelerator. Switching variants evicts the current
//! occupant to host memory and promotes the requested one; evicted runners are
//! kept so coming back to them only costs a transfer.
//!
//! # Transitions
//!
//! | From | To | Trigger |
//! |------|----|---------|
//! | unbuilt | fast | first `use_variant` (construct, then promote) |
//! | fast | spill | another variant is requested (evict) |
//! | spill | fast | requested again (promote) |
//!
//! The whole of `use_variant` runs under one manager-wide async mutex. An
//! eviction and the following promotion form a single transition and never
//! interleave with another caller.

use crate::error::{VramslotError, VramslotResult};
use crate::provision::ArtifactResolver;
use crate::registry::{VariantRegistry, VariantSpec};
use crate::runner::descriptor::{DescriptorLoader, RunnerConfig};
use crate::runner::state::{ActiveRunner, ManagerState, Residency, RunnerState, RunnerStatus};
use crate::runner::unit::{Device, Location, Runner, RunnerFactory};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Collaborators the manager delegates to
pub struct ManagerParts {
    pub registry: VariantRegistry,
    pub resolver: Arc<dyn ArtifactResolver>,
    pub loader: Arc<dyn DescriptorLoader>,
    pub factory: Arc<dyn RunnerFactory>,
    pub device: Arc<dyn Device>,
}

/// Keeps at most one variant resident on the accelerator
pub struct RunnerManager {
    registry: VariantRegistry,
    resolver: Arc<dyn ArtifactResolver>,
    loader: Arc<dyn DescriptorLoader>,
    factory: Arc<dyn RunnerFactory>,
    device: Arc<dyn Device>,
    state: Mutex<ManagerState>,
}

impl RunnerManager {
    /// Create a manager with nothing constructed yet
    pub fn new(parts: ManagerParts) -> Self {
        Self {
            registry: parts.registry,
            resolver: parts.resolver,
            loader: parts.loader,
            factory: parts.factory,
            device: parts.device,
            state: Mutex::new(ManagerState::default()),
        }
    }

    /// Create a manager and make `default_variant` resident immediately
    pub async fn start(parts: ManagerParts, default_variant: &str) -> VramslotResult<Self> {
        let manager = Self::new(parts);
        manager.use_variant(default_variant).await?;
        Ok(manager)
    }

    /// Make `id` the accelerator-resident variant and return a handle to it
    pub async fn use_variant(&self, id: &str) -> VramslotResult<ActiveRunner> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let spec = self.registry.lookup(id)?;

        if state.active.as_deref() == Some(id) {
            if let Some(entry) = state.runners.get(id) {
                if entry.is_settled() {
                    debug!("Variant {} already resident", id);
                    return Ok(entry.lease(id));
                }
            }
        }

        if let Some(previous) = state.active.clone() {
            if previous != id {
                self.evict(state, &previous).await?;
            }
        }

        if !state.runners.contains_key(id) {
            let entry = self.construct(spec).await?;
            state.runners.insert(id.to_string(), entry);
        }

        self.promote(state, id).await
    }

    /// Variant currently occupying the accelerator
    pub async fn active(&self) -> Option<String> {
        self.state.lock().await.active.clone()
    }

    /// Snapshot of every registered variant, in registry order
    pub async fn status(&self) -> Vec<RunnerStatus> {
        let state = self.state.lock().await;
        self.registry
            .iter()
            .map(|spec| {
                let entry = state.runners.get(&spec.id);
                RunnerStatus {
                    id: spec.id.clone(),
                    residency: state.residency(&spec.id),
                    built_at: entry.map(|e| e.built_at),
                    promotions: entry.map_or(0, |e| e.promotions),
                }
            })
            .collect()
    }

    /// Move the active variant to host memory and release device caches
    ///
    /// Any failure here aborts the whole transition before a promotion runs.
    async fn evict(&self, state: &mut ManagerState, id: &str) -> VramslotResult<()> {
        if let Some(entry) = state.runners.get_mut(id) {
            if entry.residency == Residency::Fast {
                entry
                    .runner
                    .move_to(Location::Host)
                    .await
                    .map_err(|e| transfer_error(id, Location::Host, e))?;
                entry.residency = Residency::Spill;
                info!("Evicted {} to host memory", id);
            }
        }
        state.active = None;

        self.device
            .release_cached()
            .await
            .map_err(|e| transfer_error(id, Location::Host, e))?;
        debug!("Released cached memory on {}", self.device.name());
        Ok(())
    }

    /// Move a constructed variant onto the accelerator and mark it active
    async fn promote(&self, state: &mut ManagerState, id: &str) -> VramslotResult<ActiveRunner> {
        let entry = state
            .runners
            .get_mut(id)
            .ok_or_else(|| VramslotError::Internal(format!("no runner constructed for {}", id)))?;

        if entry.residency != Residency::Fast {
            entry
                .runner
                .move_to(Location::Accelerator)
                .await
                .map_err(|e| transfer_error(id, Location::Accelerator, e))?;
            entry.residency = Residency::Fast;
            entry.limited = false;
            entry.promotions += 1;
            info!("Promoted {} to {}", id, self.device.name());
        }
        state.active = Some(id.to_string());

        // Some runners drop their limit when moved between devices.
        if !entry.limited {
            apply_capacity_limit(id, entry.runner.as_ref(), &entry.config)?;
            entry.limited = true;
        }

        Ok(entry.lease(id))
    }

    /// Build a runner from its recipe; nothing is recorded on failure
    async fn construct(&self, spec: &VariantSpec) -> VramslotResult<RunnerState> {
        let checkpoint = self.resolver.resolve(&spec.checkpoint)?;

        let mut config = self.loader.load(&spec.descriptor).await?;
        config.normalize();

        info!("Constructing runner {} from {}", spec.id, checkpoint.display());
        let runner = self.factory.build(spec, &config, &checkpoint).await?;
        apply_capacity_limit(&spec.id, runner.as_ref(), &config)?;

        Ok(RunnerState::new(runner, config))
    }
}

/// Invoke the runner's capacity limiter, if it has one and a limit is declared
fn apply_capacity_limit(id: &str, runner: &dyn Runner, config: &RunnerConfig) -> VramslotResult<()> {
    let Some(limiter) = runner.capacity_limiter() else {
        return Ok(());
    };

    match config.vae.memory_limit.as_ref() {
        Some(limit) => {
            limiter.limit_capacity(limit)?;
            debug!("Applied memory limit to {}: {:?}", id, limit.0);
        }
        None => debug!("Runner {} has a limiter but no memory_limit is declared", id),
    }
    Ok(())
}

fn transfer_error(id: &str, target: Location, err: VramslotError) -> VramslotError {
    match err {
        VramslotError::DeviceTransfer { .. } => err,
        other => VramslotError::DeviceTransfer {
            variant: id.to_string(),
            target: target.to_string(),
            reason: other.to_string(),
        },
    }
}

//! Runner cache
//!
//! Lazily constructs model runners and keeps exactly one of them on the
//! accelerator at a time.

pub mod descriptor;
pub mod manager;
pub mod state;
pub mod unit;

pub use descriptor::{DescriptorLoader, MemoryLimit, RunnerConfig, TomlDescriptorLoader};
pub use manager::{ManagerParts, RunnerManager};
pub use state::{ActiveRunner, Residency, RunnerStatus};
pub use unit::{CapacityLimiter, Device, Location, Runner, RunnerFactory};

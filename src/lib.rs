//! vramslot - single-slot accelerator runner cache
//!
//! Holds several expensive model runners and guarantees that at most one of
//! them occupies accelerator memory at any time. Runners not in use are
//! parked in host memory instead of being dropped.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod provision;
pub mod registry;
pub mod runner;

pub use error::{VramslotError, VramslotResult};
pub use registry::{VariantRegistry, VariantSpec};
pub use runner::{ActiveRunner, ManagerParts, Residency, RunnerManager};

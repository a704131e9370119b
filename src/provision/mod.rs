//! Artifact provisioning
//!
//! Checkpoints and support archives live in a local cache directory. The
//! runner manager only ever resolves paths through [`ArtifactResolver`];
//! fetching missing artifacts is a separate, explicit step.
//!
//! # Layout
//!
//! | Path | Contents |
//! |------|----------|
//! | `<base>/` | fetched artifacts and extracted archives |
//! | `<base>/<weights>/` | checkpoints resolved by the manager |

mod fetch;
mod store;

pub use fetch::{download_command, Downloader, PgetDownloader};
pub use store::ArtifactStore;

use crate::error::VramslotResult;
use std::path::PathBuf;

/// Resolves a logical checkpoint name to a local file
pub trait ArtifactResolver: Send + Sync {
    /// Returns the local path, or `MissingArtifact` if it is not on disk
    fn resolve(&self, filename: &str) -> VramslotResult<PathBuf>;
}

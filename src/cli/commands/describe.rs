//! Describe command - print a variant's normalized runner configuration

use crate::cli::args::DescribeArgs;
use crate::cli::commands::Context;
use crate::error::VramslotResult;
use crate::runner::{DescriptorLoader, TomlDescriptorLoader};
use tracing::debug;

/// Execute the describe command
pub async fn execute(args: DescribeArgs, ctx: &Context) -> VramslotResult<()> {
    let registry = ctx.registry();
    let spec = registry.lookup(&args.variant)?;
    debug!("Describing {} from {}", spec.id, spec.descriptor.display());

    let mut config = TomlDescriptorLoader.load(&spec.descriptor).await?;
    config.normalize();

    print!("{}", config.to_toml()?);
    Ok(())
}

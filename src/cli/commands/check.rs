//! Check command - verify every variant can be constructed
//!
//! Resolves each checkpoint and loads each descriptor through the same
//! collaborators the runner manager uses, without touching the accelerator.

use crate::cli::commands::Context;
use crate::error::{VramslotError, VramslotResult};
use crate::provision::ArtifactResolver;
use crate::registry::VariantSpec;
use crate::runner::{DescriptorLoader, RunnerConfig, TomlDescriptorLoader};
use console::{style, Emoji};
use futures_util::future::join_all;
use std::path::PathBuf;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");

/// Outcome of checking one variant
pub struct VariantCheck {
    pub id: String,
    pub result: VramslotResult<(PathBuf, RunnerConfig)>,
}

/// Resolve and load one variant's recipe
pub async fn check_variant(
    spec: &VariantSpec,
    resolver: &dyn ArtifactResolver,
    loader: &dyn DescriptorLoader,
) -> VariantCheck {
    let result = async {
        let checkpoint = resolver.resolve(&spec.checkpoint)?;
        let mut config = loader.load(&spec.descriptor).await?;
        config.normalize();
        Ok::<_, VramslotError>((checkpoint, config))
    }
    .await;

    VariantCheck {
        id: spec.id.clone(),
        result,
    }
}

/// Execute the check command
pub async fn execute(ctx: &Context) -> VramslotResult<()> {
    let registry = ctx.registry();
    let store = ctx.store();
    let loader = TomlDescriptorLoader;

    println!("{}", style("Variant Check").bold().cyan());
    println!();

    let checks = join_all(
        registry
            .iter()
            .map(|spec| check_variant(spec, &store, &loader)),
    )
    .await;

    let mut failed = 0;
    for check in &checks {
        match &check.result {
            Ok((checkpoint, config)) => {
                let limit = if config.vae.memory_limit.is_some() {
                    "memory limit declared"
                } else {
                    "no memory limit"
                };
                println!(
                    "  {} {} - {} ({})",
                    CHECK,
                    style(&check.id).green(),
                    checkpoint.display(),
                    limit
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {} {} - {}", CROSS, style(&check.id).red(), e);
                if let Some(hint) = e.hint() {
                    println!("      {}", style(hint).dim());
                }
            }
        }
    }

    println!();
    if failed > 0 {
        return Err(VramslotError::User(format!(
            "{} of {} variant(s) failed checks",
            failed,
            checks.len()
        )));
    }

    println!("{}", style("All variants ready").green().bold());
    Ok(())
}

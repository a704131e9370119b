//! Variants command - list registered model variants

use crate::cli::args::{OutputFormat, VariantsArgs};
use crate::cli::commands::Context;
use crate::error::VramslotResult;
use crate::provision::{ArtifactResolver, ArtifactStore};
use crate::registry::{VariantRegistry, VariantSpec};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct VariantRow<'a> {
    id: &'a str,
    checkpoint: &'a str,
    descriptor: String,
    available: bool,
    default: bool,
}

/// Execute the variants command
pub async fn execute(args: VariantsArgs, ctx: &Context) -> VramslotResult<()> {
    let registry = ctx.registry();
    let store = ctx.store();
    let rows = rows(&registry, &store, &ctx.config.manager.default_variant);

    if rows.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No variants configured"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}", row.id);
            }
        }
    }

    Ok(())
}

fn rows<'a>(
    registry: &'a VariantRegistry,
    store: &ArtifactStore,
    default_variant: &str,
) -> Vec<VariantRow<'a>> {
    registry
        .iter()
        .map(|spec: &'a VariantSpec| VariantRow {
            id: &spec.id,
            checkpoint: &spec.checkpoint,
            descriptor: spec.descriptor.display().to_string(),
            available: store.resolve(&spec.checkpoint).is_ok(),
            default: spec.id == default_variant,
        })
        .collect()
}

fn print_table(rows: &[VariantRow<'_>]) {
    println!(
        "{:<10} {:<28} {:<12} {:<40}",
        style("VARIANT").bold(),
        style("CHECKPOINT").bold(),
        style("WEIGHTS").bold(),
        style("DESCRIPTOR").bold()
    );
    println!("{}", "-".repeat(90));

    for row in rows {
        let id = if row.default {
            format!("{}*", row.id)
        } else {
            row.id.to_string()
        };
        let available = if row.available {
            style("present").green()
        } else {
            style("missing").red()
        };
        println!(
            "{:<10} {:<28} {:<12} {:<40}",
            id, row.checkpoint, available, row.descriptor
        );
    }

    println!();
    println!("{} variant(s), * = default", rows.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn rows_report_availability_and_default() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::open(temp.path(), "weights");
        std::fs::create_dir_all(store.weights_dir()).unwrap();
        std::fs::write(store.weights_dir().join("seedvr2_ema_7b.pth"), b"").unwrap();

        let registry = VariantRegistry::from_config(&Config::default(), Path::new("/cfg"));
        let rows = rows(&registry, &store, "3b");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "3b");
        assert!(rows[0].default);
        assert!(!rows[0].available);
        assert!(rows[1].available);
        assert_eq!(rows[1].descriptor, "/cfg/configs/7b.toml");
    }
}

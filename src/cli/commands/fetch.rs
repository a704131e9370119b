//! Fetch command - provision the local artifact cache

use crate::cli::args::FetchArgs;
use crate::cli::commands::Context;
use crate::error::VramslotResult;
use crate::provision::PgetDownloader;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, ctx: &Context) -> VramslotResult<()> {
    let cache = &ctx.config.cache;
    let store = ctx.store();

    let pending: Vec<&str> = if args.force {
        cache.artifacts.iter().map(String::as_str).collect()
    } else {
        store.missing(&cache.artifacts)
    };

    if pending.is_empty() {
        println!(
            "All {} artifact(s) present in {}",
            cache.artifacts.len(),
            store.base_dir().display()
        );
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Fetching {}", pending.join(", ")));

    let result = store
        .ensure(&PgetDownloader::new(), &cache.base_url, &cache.artifacts, args.force)
        .await;
    spinner.finish_and_clear();

    let fetched = result?;
    for artifact in &fetched {
        println!("  {} {}", style("fetched").green(), artifact);
    }
    println!(
        "{} artifact(s) fetched into {}",
        fetched.len(),
        store.base_dir().display()
    );
    Ok(())
}

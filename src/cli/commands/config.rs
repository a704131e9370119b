//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::cli::commands::Context;
use crate::config::Config;
use crate::error::VramslotResult;
use console::style;

/// Execute the config command
pub async fn execute(args: ConfigArgs, ctx: &Context) -> VramslotResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(&ctx.config)?,
        Some(ConfigAction::Path) => println!("{}", ctx.manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(ctx, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> VramslotResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(ctx: &Context, force: bool) -> VramslotResult<()> {
    let path = ctx.manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {}",
            style("!").yellow(),
            path.display()
        );
        println!("  Use --force to overwrite");
        return Ok(());
    }

    ctx.manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

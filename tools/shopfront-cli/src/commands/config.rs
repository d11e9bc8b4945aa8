//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("[api]");
    ctx.output
        .kv("product_url", api.product_url.as_deref().unwrap_or("(not set)"));
    ctx.output
        .kv("checkout_url", api.checkout_url.as_deref().unwrap_or("(not set)"));
    ctx.output.kv("postal_lookup_url", &api.postal_lookup_url);
    ctx.output.kv("timeout_secs", &api.timeout_secs.to_string());

    ctx.output.info("[storage]");
    ctx.output.kv("path", &ctx.config.storage.path);

    let cart = &ctx.config.cart;
    ctx.output.info("[cart]");
    ctx.output.kv("currency", &cart.currency);
    ctx.output.kv("ttl_secs", &cart.ttl_secs.to_string());
    ctx.output
        .kv("sweep_interval_secs", &cart.sweep_interval_secs.to_string());
    ctx.output.kv(
        "refresh_on_quantity_edit",
        &cart.refresh_on_quantity_edit.to_string(),
    );

    let selection = &ctx.config.selection;
    ctx.output.info("[selection]");
    ctx.output.kv("ttl_secs", &selection.ttl_secs.to_string());
    ctx.output.kv(
        "sweep_interval_secs",
        &selection.sweep_interval_secs.to_string(),
    );
    ctx.output.kv(
        "reset_on_primary_change",
        &selection.reset_on_primary_change.to_string(),
    );

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shopfront.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let errors = ctx.config.validate();
    let mut warnings = Vec::new();
    if ctx.config.api.product_url.is_none() {
        warnings.push("api.product_url is not set; product commands will fail");
    }
    if ctx.config.api.checkout_url.is_none() {
        warnings.push("api.checkout_url is not set; checkout will fail");
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }
    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }
    Ok(())
}

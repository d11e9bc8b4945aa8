//! Shopfront CLI - a terminal storefront for a single product.
//!
//! Commands:
//! - `shopfront product` - Show the product and choose a variant
//! - `shopfront cart` - Add, change and remove cart lines
//! - `shopfront shipping` - Look up an address by postal code
//! - `shopfront checkout` - Submit the cart
//! - `shopfront session` - Interactive session with a live cart
//! - `shopfront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod page;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{CartArgs, CheckoutArgs, ConfigArgs, ProductArgs, ShippingArgs};

/// Shopfront CLI - Browse a product, fill a cart and check out
#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product page and manage the variant selection
    Product(ProductArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Look up the shipping address for a postal code
    Shipping(ShippingArgs),

    /// Submit the cart
    Checkout(CheckoutArgs),

    /// Start an interactive session
    Session,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise only warnings unless --verbose
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result: Result<()> = async {
        match cli.command {
            Commands::Product(args) => commands::product::run(args, &ctx, &ctx.open_shop()?).await,
            Commands::Cart(args) => commands::cart::run(args, &ctx, &ctx.open_shop()?).await,
            Commands::Shipping(args) => {
                commands::shipping::run(args, &ctx, &ctx.open_shop()?).await
            }
            Commands::Checkout(args) => {
                commands::checkout::run(args, &ctx, &ctx.open_shop()?).await
            }
            Commands::Session => commands::session::run(&ctx, &ctx.open_shop()?).await,
            Commands::Config(args) => commands::config::run(args, &ctx).await,
        }
    }
    .await;

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

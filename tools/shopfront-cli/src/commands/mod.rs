//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod product;
pub mod session;
pub mod shipping;

use clap::{Args, Subcommand};

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: Option<ProductCommand>,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// Show the product, its options and the current selection.
    Show,
    /// Choose a value for an option.
    Select {
        /// Option number (from `product show`) or name.
        option: String,
        /// Value to choose.
        value: String,
    },
    /// Pick a gallery image as the main image.
    Image {
        /// Image number (from `product show`).
        number: usize,
    },
    /// Discard the saved selection.
    Reset,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add the selected variant to the cart.
    Add {
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Show the cart.
    Show,
    /// Remove a line.
    Remove {
        /// Line number (from `cart show`).
        line: usize,
    },
    /// Set a line's quantity; zero removes it.
    Set {
        /// Line number (from `cart show`).
        line: usize,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the shipping command.
#[derive(Args)]
pub struct ShippingArgs {
    /// Postal code; formatting characters are ignored.
    #[arg(required_unless_present = "search")]
    pub postal_code: Option<String>,

    /// Validate and look up explicitly, using the saved code when none is given.
    #[arg(short, long)]
    pub search: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}

/// Parse a 1-based line or image number.
pub(crate) fn position(number: usize, len: usize, what: &str) -> anyhow::Result<usize> {
    if number == 0 || number > len {
        anyhow::bail!("No {what} {number} (there are {len})");
    }
    Ok(number - 1)
}

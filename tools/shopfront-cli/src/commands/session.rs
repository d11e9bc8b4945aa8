//! Interactive session: mounted cart and product views driven by commands on stdin.
//!
//! The cart and the product page snapshot are swept for expiry in the
//! background while the session runs. Every entered line counts as an
//! interaction that keeps both fresh.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shopfront_commerce::cart::{CartView, InteractionKind};
use shopfront_commerce::catalog::{ProductSource, SelectionView};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CartArgs, CheckoutArgs, ProductArgs, ShippingArgs};
use crate::context::{Context, Shop, Store};

/// One line of session input.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Show or change the product page
    Product(ProductArgs),
    /// Show or change the cart
    Cart(CartArgs),
    /// Look up a postal code
    Shipping(ShippingArgs),
    /// Submit the cart
    Checkout(CheckoutArgs),
    /// Leave the session
    #[command(alias = "quit")]
    Exit,
}

/// Run an interactive session until `exit` or end of input.
pub async fn run(ctx: &Context, shop: &Shop) -> Result<()> {
    let view = CartView::mount(shop.cart.clone());
    let page = mount_page(ctx, shop).await;
    ctx.output
        .info("Type `help` for commands, `exit` to leave.");
    badge(ctx, shop);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result: Result<()> = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e.into()),
        };
        view.interaction(InteractionKind::Key);
        if let Some(page) = &page {
            page.interaction(InteractionKind::Key);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Help and usage errors are both rendered by clap.
                let _ = e.print();
                continue;
            }
        };

        let outcome = match command {
            SessionCommand::Product(args) => super::product::run(args, ctx, shop).await,
            SessionCommand::Cart(args) => super::cart::run(args, ctx, shop).await,
            SessionCommand::Shipping(args) => super::shipping::run(args, ctx, shop).await,
            SessionCommand::Checkout(args) => super::checkout::run(args, ctx, shop).await,
            SessionCommand::Exit => break Ok(()),
        };
        if let Err(e) = outcome {
            ctx.output.error(&format!("{:#}", e));
        }
        badge(ctx, shop);
    };

    view.unmount().await;
    if let Some(page) = page {
        page.unmount().await;
    }
    result
}

/// Mount the configured product's page snapshot, if the product can be fetched.
async fn mount_page(ctx: &Context, shop: &Shop) -> Option<SelectionView<Store>> {
    let source = match ctx.product_source() {
        Ok(source) => source,
        Err(e) => {
            ctx.output.debug(&format!("{:#}", e));
            return None;
        }
    };
    match source.fetch_product().await {
        Ok(product) => Some(SelectionView::mount(
            ctx.selection_slot(shop, product.id),
            ctx.config.selection_sweep_interval(),
        )),
        Err(e) => {
            ctx.output
                .warn(&format!("Product page will not be kept fresh: {}", e));
            None
        }
    }
}

/// Print the cart item count, the way a header badge shows it.
fn badge(ctx: &Context, shop: &Shop) {
    if !ctx.output.is_json() {
        ctx.output
            .kv("cart", &format!("{} item(s)", shop.cart.item_count()));
    }
}

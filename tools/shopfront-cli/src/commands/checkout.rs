//! Checkout command.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use shopfront_commerce::checkout::{build_checkout, checkout};

use super::CheckoutArgs;
use crate::context::{Context, Shop};

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context, shop: &Shop) -> Result<()> {
    let cart = shop.cart.snapshot();
    // Validates before anything else so an empty cart never needs a gateway.
    let lines = build_checkout(&cart)?;
    let gateway = ctx.checkout_gateway()?;

    if !ctx.output.is_json() {
        ctx.output.header("Checkout");
        for item in cart.items() {
            ctx.output
                .list_item(&format!("{} x {} ({})", item.quantity, item.name, item.key));
        }
        ctx.output.kv("total", &cart.total().display());
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Submit {} line(s)?", lines.len()))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Checkout cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Submitting order...");
    let outcome = checkout(&shop.cart, &gateway).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "completed": outcome.is_completed(),
            "message": outcome.message(),
        }));
    }
    if !outcome.is_completed() {
        bail!(outcome.message());
    }
    ctx.output.success(outcome.message());
    Ok(())
}

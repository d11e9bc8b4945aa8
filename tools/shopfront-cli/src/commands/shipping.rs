//! Shipping estimate command.

use anyhow::{bail, Result};

use super::ShippingArgs;
use crate::context::{Context, Shop};
use crate::page::ProductPage;

/// Run the shipping command.
pub async fn run(args: ShippingArgs, ctx: &Context, shop: &Shop) -> Result<()> {
    let mut page = ProductPage::open(ctx, shop).await?;
    let lookup = ctx.address_lookup()?;

    if !args.search && args.postal_code.is_none() {
        bail!("A postal code is required without --search");
    }

    let spinner = ctx.output.spinner("Looking up address...");
    let looked_up = match (args.search, args.postal_code.as_deref()) {
        (true, raw) => {
            if let Some(raw) = raw {
                page.shipping.set_input(raw);
            }
            page.shipping.search(&lookup).await;
            true
        }
        (false, Some(raw)) => page.shipping.handle_input(raw, &lookup).await,
        (false, None) => false,
    };
    spinner.finish_and_clear();
    page.save()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "postal_code": page.shipping.input(),
            "address": page.shipping.address(),
            "error": page.shipping.error(),
        }));
        return Ok(());
    }

    ctx.output.kv("postal code", page.shipping.input());
    if !looked_up {
        ctx.output
            .info("Enter all 8 digits to look up the delivery address");
        return Ok(());
    }
    match (page.shipping.address(), page.shipping.error()) {
        (Some(address), _) => {
            ctx.output.success("Delivery address found");
            for line in address.multi_line().lines() {
                ctx.output.list_item(line);
            }
        }
        (None, Some(error)) => ctx.output.error(error),
        (None, None) => {}
    }
    Ok(())
}

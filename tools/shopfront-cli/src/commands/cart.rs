//! Cart commands.

use anyhow::Result;
use serde::Serialize;
use shopfront_cache::Clock;
use shopfront_commerce::cart::CartItem;

use super::{position, CartArgs, CartCommand};
use crate::context::{Context, Shop};
use crate::output::format_expiry;
use crate::page::ProductPage;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context, shop: &Shop) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Add { quantity } => add(quantity, ctx, shop).await,
        CartCommand::Show => {
            show(ctx, shop);
            Ok(())
        }
        CartCommand::Remove { line } => remove(line, ctx, shop),
        CartCommand::Set { line, quantity } => set_quantity(line, quantity, ctx, shop),
        CartCommand::Clear => {
            shop.cart.update(|store| store.clear());
            ctx.output.success("Cart cleared");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct CartReport {
    items: Vec<CartItem>,
    item_count: i64,
    total: String,
    total_cents: i64,
    expires_at: Option<i64>,
}

/// Print the cart.
pub fn show(ctx: &Context, shop: &Shop) {
    let (cart, expires_at) = shop
        .cart
        .with(|store| (store.cart().clone(), store.expires_at()));

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            total: cart.total().display(),
            total_cents: cart.total().amount_cents,
            expires_at,
        });
        return;
    }

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let rows: Vec<Vec<String>> = cart
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let subtotal = item
                .line_total()
                .map(|m| m.display())
                .unwrap_or_else(|e| e.to_string());
            vec![
                (i + 1).to_string(),
                format!("{} ({})", item.name, item.key),
                item.unit_price.display(),
                item.quantity.to_string(),
                subtotal,
            ]
        })
        .collect();
    ctx.output
        .table(&["#", "ITEM", "UNIT", "QTY", "SUBTOTAL"], &rows);
    ctx.output.kv("total", &cart.total().display());
    if let Some(expires_at) = expires_at {
        ctx.output
            .kv("expires", &format_expiry(expires_at, ctx.clock.now_millis()));
    }
}

async fn add(quantity: i64, ctx: &Context, shop: &Shop) -> Result<()> {
    let page = ProductPage::open(ctx, shop).await?;
    let item = page.selector.line_item(quantity)?;
    let label = format!("{} x {} ({})", quantity, item.name, item.key);

    shop.cart.update(|store| store.add(item))?;
    ctx.output.success(&format!("Added {label}"));
    ctx.output
        .kv("cart total", &shop.cart.total().display());
    Ok(())
}

fn remove(line: usize, ctx: &Context, shop: &Shop) -> Result<()> {
    let removed = shop.cart.update(|store| -> Result<CartItem> {
        let index = position(line, store.cart().unique_item_count(), "line")?;
        let item = store.cart().items()[index].clone();
        store.remove(&item.product_id, &item.key);
        Ok(item)
    })?;
    ctx.output
        .success(&format!("Removed {} ({})", removed.name, removed.key));
    Ok(())
}

fn set_quantity(line: usize, quantity: i64, ctx: &Context, shop: &Shop) -> Result<()> {
    let item = shop.cart.update(|store| -> Result<CartItem> {
        let index = position(line, store.cart().unique_item_count(), "line")?;
        let item = store.cart().items()[index].clone();
        store.set_quantity(&item.product_id, &item.key, quantity)?;
        Ok(item)
    })?;
    if quantity <= 0 {
        ctx.output
            .success(&format!("Removed {} ({})", item.name, item.key));
    } else {
        ctx.output.success(&format!(
            "{} ({}) quantity set to {quantity}",
            item.name, item.key
        ));
    }
    Ok(())
}

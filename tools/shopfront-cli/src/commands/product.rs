//! Product page commands.

use anyhow::{anyhow, Result};
use serde::Serialize;
use shopfront_commerce::catalog::{Product, ProductVariant, Selection};
use shopfront_commerce::checkout::Address;

use super::{position, ProductArgs, ProductCommand};
use crate::context::{Context, Shop};
use crate::output::stock_badge;
use crate::page::ProductPage;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context, shop: &Shop) -> Result<()> {
    let mut page = ProductPage::open(ctx, shop).await?;
    match args.command.unwrap_or(ProductCommand::Show) {
        ProductCommand::Show => {
            show(&page, ctx);
            Ok(())
        }
        ProductCommand::Select { option, value } => select(&mut page, &option, value, ctx),
        ProductCommand::Image { number } => pick_image(&mut page, number, ctx),
        ProductCommand::Reset => {
            page.discard()?;
            ctx.output.success("Selection cleared");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ProductReport<'a> {
    product: &'a Product,
    selected: &'a Selection,
    resolved: Option<&'a ProductVariant>,
    can_add_to_cart: bool,
    main_image: Option<&'a str>,
    postal_code: &'a str,
    address: Option<&'a Address>,
}

/// Print the product page.
pub fn show(page: &ProductPage, ctx: &Context) {
    let selector = &page.selector;
    let product = selector.product();

    if ctx.output.is_json() {
        ctx.output.json(&ProductReport {
            product,
            selected: selector.selection(),
            resolved: selector.resolved(),
            can_add_to_cart: selector.can_add_to_cart(),
            main_image: selector.display_image(),
            postal_code: page.shipping.input(),
            address: page.shipping.address(),
        });
        return;
    }

    ctx.output.header(&product.title);
    if let Some(ref description) = product.description {
        ctx.output.info(description);
    }
    match selector.resolved() {
        Some(variant) => {
            ctx.output.kv("variant", &variant.build_name());
            ctx.output.kv("price", &variant_price(product, variant));
            ctx.output.kv("stock", &stock_badge(variant.inventory_quantity));
        }
        None if selector.selection().is_complete() => {
            ctx.output.kv("variant", "unavailable in this combination");
        }
        None => ctx.output.kv("variant", "choose every option to see price and stock"),
    }
    if let Some(image) = selector.display_image() {
        ctx.output.kv("image", image);
    }

    ctx.output.header("Options");
    for index in 0..product.option_count() {
        let chosen = selector.selection().get(index);
        let values: Vec<String> = selector
            .available_values(index)
            .into_iter()
            .map(|value| {
                if Some(value) == chosen {
                    format!("[{value}]")
                } else {
                    value.to_string()
                }
            })
            .collect();
        ctx.output.list_item(&format!(
            "{}. {}: {}",
            index + 1,
            product.option_name(index),
            values.join(", ")
        ));
    }

    ctx.output.header("Variants");
    let rows: Vec<Vec<String>> = product
        .variants
        .iter()
        .map(|variant| {
            vec![
                variant.id.to_string(),
                variant.build_name(),
                variant_price(product, variant),
                stock_badge(variant.inventory_quantity),
            ]
        })
        .collect();
    ctx.output.table(&["ID", "OPTIONS", "PRICE", "STOCK"], &rows);

    let gallery = product.gallery();
    if !gallery.is_empty() {
        ctx.output.header("Gallery");
        let main = selector.display_image();
        for (i, url) in gallery.iter().enumerate() {
            let marker = if Some(*url) == main { " (main)" } else { "" };
            ctx.output.list_item(&format!("{}. {url}{marker}", i + 1));
        }
    }

    if !page.shipping.input().is_empty() {
        ctx.output.header("Shipping");
        ctx.output.kv("postal code", page.shipping.input());
        if let Some(address) = page.shipping.address() {
            ctx.output.kv("address", &address.one_line());
        }
    }
}

fn select(page: &mut ProductPage, option: &str, value: String, ctx: &Context) -> Result<()> {
    let product = page.selector.product();
    let index = match option.trim().parse::<usize>() {
        Ok(number) => position(number, product.option_count(), "option")?,
        Err(_) => product
            .option_index(option)
            .ok_or_else(|| anyhow!("Unknown option: {option}"))?,
    };
    if !product.option_values(index).contains(&value.as_str()) {
        ctx.output.warn(&format!(
            "'{value}' is not a listed value for {}",
            product.option_name(index)
        ));
    }

    page.selector.select_option(index, value)?;
    page.save()?;

    let selector = &page.selector;
    match selector.resolved() {
        Some(variant) if variant.is_in_stock() => ctx.output.success(&format!(
            "Selected {} at {}",
            variant.build_name(),
            variant_price(selector.product(), variant)
        )),
        Some(variant) => ctx
            .output
            .warn(&format!("{} is out of stock", variant.build_name())),
        None if selector.selection().is_complete() => ctx
            .output
            .warn("No variant matches this combination"),
        None => ctx.output.info("Choose the remaining options"),
    }
    if ctx.output.is_json() {
        show(page, ctx);
    }
    Ok(())
}

fn pick_image(page: &mut ProductPage, number: usize, ctx: &Context) -> Result<()> {
    let gallery = page.selector.product().gallery();
    let url = gallery[position(number, gallery.len(), "image")?].to_string();
    page.selector.set_main_image(&url);
    page.save()?;
    ctx.output.success(&format!("Main image: {url}"));
    Ok(())
}

fn variant_price(product: &Product, variant: &ProductVariant) -> String {
    variant
        .unit_price(product.currency)
        .map(|price| price.display())
        .unwrap_or_else(|_| variant.price.to_string())
}

//! Cart commands.
//!
//! Changes are persisted by the storefront state when a customer is
//! signed in; `main` waits for that before exiting.

use market_core::ProductId;
use market_storefront::AppContext;

use crate::output;

/// Print each cart line, then the count and total.
pub fn show(ctx: &AppContext) {
    let cart = ctx.cart();
    let lines: Vec<_> = cart
        .iter()
        .map(|(id, quantity)| (ctx.product(id), id.clone(), quantity))
        .collect();
    output::cart_lines(&lines);
    output::cart_summary(ctx.cart_item_count(), ctx.cart_total());
}

pub fn add(ctx: &AppContext, id: &str) {
    ctx.add_to_cart(&ProductId::new(id));
    show(ctx);
}

pub fn update(ctx: &AppContext, id: &str, quantity: u32) {
    ctx.update_cart_item(&ProductId::new(id), quantity);
    show(ctx);
}

pub fn remove(ctx: &AppContext, id: &str) {
    ctx.remove_from_cart(&ProductId::new(id));
    show(ctx);
}

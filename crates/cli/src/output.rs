//! Terminal rendering.
//!
//! Results go to stdout; notifications and fatal errors go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use tokio::sync::broadcast::{self, error::TryRecvError};

use market_core::{Price, Product, ProductId};
use market_storefront::catalog::ProductDetail;
use market_storefront::models::Session;
use market_storefront::{Notification, NotificationLevel};

pub fn line(text: &str) {
    println!("{text}");
}

/// Report an error that happened before logging was set up.
pub fn fatal(error: &dyn std::error::Error) {
    eprintln!("error: {error}");
}

pub fn session(session: &Session) {
    match &session.user {
        Some(user) => println!("Customer: {}", user.display_name()),
        None => println!("Customer: not signed in"),
    }
    println!("Seller:   {}", if session.is_seller { "yes" } else { "no" });
}

pub fn product_list(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        println!(
            "{:<26} {:<32} {:<14} {:>9}{}",
            product.id.as_str(),
            product.name,
            product.category,
            product.offer_price.to_string(),
            if product.in_stock { "" } else { "  (out of stock)" },
        );
    }
}

pub fn product_detail(detail: &ProductDetail) {
    let product = &detail.product;
    println!("{}  [{}]", product.name, detail.category_path);
    println!(
        "{}{}  ({}/5)",
        "*".repeat(usize::from(detail.stars)),
        "-".repeat(usize::from(market_core::MAX_STARS.saturating_sub(detail.stars))),
        detail.stars,
    );
    println!("MRP: {}  Price: {}", product.price, product.offer_price);
    if let Some(thumbnail) = &detail.thumbnail {
        println!("Image: {thumbnail}");
    }
    for line in &detail.description {
        println!("  - {line}");
    }
    if !detail.related.is_empty() {
        println!();
        println!("Related products:");
        product_list(&detail.related);
    }
}

pub fn cart_lines(lines: &[(Option<Product>, ProductId, u32)]) {
    if lines.is_empty() {
        println!("Cart is empty");
        return;
    }
    for (product, id, quantity) in lines {
        match product {
            Some(product) => println!(
                "{:<32} x{:<4} {:>10}",
                product.name,
                quantity,
                product.offer_price.times(*quantity).to_string(),
            ),
            None => println!("{id:<32} x{quantity:<4} {:>10}", "unavailable"),
        }
    }
}

pub fn cart_summary(count: u64, total: Price) {
    println!("Items: {count}  Total: {total}");
}

/// Print every notification published so far.
pub fn notifications(rx: &mut broadcast::Receiver<Notification>) {
    loop {
        match rx.try_recv() {
            Ok(notification) => {
                let tag = match notification.level {
                    NotificationLevel::Success => "ok",
                    NotificationLevel::Error => "error",
                };
                eprintln!("[{tag}] {}", notification.message);
            }
            Err(TryRecvError::Lagged(skipped)) => {
                eprintln!("[warn] {skipped} notifications dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return,
        }
    }
}

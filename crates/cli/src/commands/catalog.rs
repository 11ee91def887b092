//! Catalog commands.

use market_core::ProductId;
use market_storefront::AppContext;

use crate::error::CliError;
use crate::output;

/// List the catalog, optionally limited to one category.
pub fn products(ctx: &AppContext, category: Option<&str>) {
    let products = match category {
        Some(category) => ctx.products_in_category(category),
        None => ctx.products().to_vec(),
    };
    output::product_list(&products);
}

/// Print a product page with its related products.
pub fn product(ctx: &AppContext, id: &str) -> Result<(), CliError> {
    let detail = ctx
        .product_detail(&ProductId::new(id))
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))?;
    output::product_detail(&detail);
    Ok(())
}

/// Print in-stock products whose name matches `query`.
pub fn search(ctx: &AppContext, query: &str) {
    ctx.set_search_query(query);
    output::product_list(&ctx.search_results());
}

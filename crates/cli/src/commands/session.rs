//! Session commands: status, logins and logout.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use market_storefront::{AppContext, Credentials};

use crate::error::CliError;
use crate::output;

/// Print who is signed in and a cart summary.
pub fn status(ctx: &AppContext) {
    output::session(&ctx.session());
    output::cart_summary(ctx.cart_item_count(), ctx.cart_total());
}

/// Log in as a customer; their persisted cart becomes the local cart.
pub async fn customer_login(
    ctx: &AppContext,
    email: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let credentials = Credentials::new(email, password.expose_secret())?;
    ctx.customer_login(&credentials).await?;
    info!(email, entries = ctx.cart().len(), "Customer session ready");
    Ok(())
}

/// Log in as a seller and print the route the dashboard lives at.
pub async fn seller_login(
    ctx: &AppContext,
    email: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let credentials = Credentials::new(email, password.expose_secret())?;
    let landing = ctx.seller_login(&credentials).await?;
    output::line(&format!("Seller session started, continue at {landing}"));
    Ok(())
}

/// End the customer session.
pub async fn logout(ctx: &AppContext) {
    ctx.logout_customer().await;
    output::session(&ctx.session());
}

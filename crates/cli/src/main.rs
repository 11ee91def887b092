//! Market CLI - drive the storefront state from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show who is signed in and what the cart holds
//! market status
//!
//! # Browse the catalog
//! market products --category fruits
//! market product 66a1f0c2
//! market search "apple"
//!
//! # Change a customer's cart (password from MARKET_PASSWORD)
//! market --email ada@example.com cart add 66a1f0c2
//! market --email ada@example.com cart update 66a1f0c2 3
//!
//! # Log in as a seller
//! market --email seller@example.com seller-login
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_BACKEND_URL` - Backend base URL (required)
//! - `MARKET_EMAIL` - Same as `--email`
//! - `MARKET_PASSWORD` - Password used with `--email`
//! - `SENTRY_DSN` - Enables error reporting when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_storefront::{AppContext, StorefrontConfig};

mod commands;
mod error;
mod output;

use error::CliError;

#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about = "Market storefront client")]
struct Cli {
    /// Email to log in with before running the command
    #[arg(short, long, global = true, env = "MARKET_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the session and cart summary
    Status,
    /// List products
    Products {
        /// Only list products of this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a product page
    Product {
        /// Product ID
        id: String,
    },
    /// Search in-stock products by name
    Search {
        /// Search text
        query: String,
    },
    /// Inspect or change the customer cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in as a seller using `--email`
    SellerLogin,
    /// End the current customer session
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },
    /// Set the quantity of a product (0 removes it)
    Update {
        /// Product ID
        id: String,
        /// New quantity
        quantity: u32,
    },
    /// Take one unit of a product out
    Remove {
        /// Product ID
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads MARKET_EMAIL
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::fatal(&e);
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "market_storefront=warn,market_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let ctx = AppContext::connect(config)?;
    let mut notifications = ctx.subscribe_notifications();

    ctx.bootstrap().await;
    let result = execute(&ctx, cli).await;

    ctx.wait_for_cart_sync().await;
    output::notifications(&mut notifications);
    result
}

async fn execute(ctx: &AppContext, cli: Cli) -> Result<(), CliError> {
    let email = cli.email.as_deref();
    if let (Some(email), false) = (email, matches!(cli.command, Commands::SellerLogin)) {
        commands::session::customer_login(ctx, email, &password()?).await?;
    }

    match cli.command {
        Commands::Status => commands::session::status(ctx),
        Commands::Products { category } => commands::catalog::products(ctx, category.as_deref()),
        Commands::Product { id } => commands::catalog::product(ctx, &id)?,
        Commands::Search { query } => commands::catalog::search(ctx, &query),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add { id } => commands::cart::add(ctx, &id),
            CartAction::Update { id, quantity } => commands::cart::update(ctx, &id, quantity),
            CartAction::Remove { id } => commands::cart::remove(ctx, &id),
        },
        Commands::SellerLogin => {
            let email = email.ok_or(CliError::MissingEmail)?;
            commands::session::seller_login(ctx, email, &password()?).await?;
        }
        Commands::Logout => commands::session::logout(ctx).await,
    }
    Ok(())
}

/// Password for `--email`, read from `MARKET_PASSWORD`.
fn password() -> Result<SecretString, CliError> {
    std::env::var("MARKET_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingPassword)
}

//! Grooveo CLI - a command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! grooveo catalog list --category Mailers --sort price-low
//!
//! # Fill the cart and check out
//! grooveo cart add eco-mailer-1 --quantity 2
//! grooveo checkout quote --promo FREESHIP
//! grooveo checkout place --promo FREESHIP --name "Asha Rao" --street "12 MG Road" \
//!     --city Bengaluru --state KA --postal-code 560001 --payment cod
//!
//! # Track orders
//! grooveo orders list
//! grooveo orders advance ORD-12346 out_for_delivery
//! ```
//!
//! # Environment Variables
//!
//! See `grooveo_storefront::config` for storefront settings. Logging is
//! controlled by `RUST_LOG`; set `GROOVEO_LOG_FORMAT=json` for JSON output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use grooveo_storefront::AppState;
use grooveo_storefront::config::StorefrontConfig;

mod commands;

use commands::{
    cart::CartAction, catalog::CatalogAction, checkout::CheckoutAction, loyalty::LoyaltyAction,
    notifications::NotificationAction, orders::OrderAction, promo::PromoAction,
    wishlist::WishlistAction,
};

#[derive(Parser)]
#[command(name = "grooveo")]
#[command(author, version, about = "Grooveo eco-packaging storefront")]
struct Cli {
    /// Keep state in memory instead of the data directory
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Inspect promo codes
    Promo {
        #[command(subcommand)]
        action: PromoAction,
    },
    /// Price the cart and place orders
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Order history and tracking
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Loyalty points
    Loyalty {
        #[command(subcommand)]
        action: LoyaltyAction,
    },
    /// Notification feed and preferences
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading GROOVEO_LOG_FORMAT (ignore errors if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Install the global subscriber. Defaults to info level for our crates if
/// `RUST_LOG` is not set.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grooveo=info,grooveo_storefront=info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    if std::env::var("GROOVEO_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = if cli.ephemeral {
        AppState::in_memory(config)
    } else {
        AppState::open(config)?
    };

    match cli.command {
        Commands::Catalog { action } => commands::catalog::run(&state, action)?,
        Commands::Cart { action } => commands::cart::run(&state, action)?,
        Commands::Wishlist { action } => commands::wishlist::run(&state, action)?,
        Commands::Promo { action } => commands::promo::run(&state, action)?,
        Commands::Checkout { action } => commands::checkout::run(&state, action).await?,
        Commands::Orders { action } => commands::orders::run(&state, action)?,
        Commands::Loyalty { action } => commands::loyalty::run(&state, action)?,
        Commands::Notifications { action } => commands::notifications::run(&state, action)?,
    }
    Ok(())
}

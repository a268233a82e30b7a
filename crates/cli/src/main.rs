//! SuperLian CLI - a command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! sl-cli products --category Phones --search "case" --page 0
//!
//! # Sign in and manage the cart
//! sl-cli auth login -e ada@example.com -p hunter22
//! sl-cli cart add --product 3 --quantity 2 --color black
//! sl-cli cart inc 17
//!
//! # Check out with the profile's saved addresses
//! sl-cli checkout --card-number "4242 4242 4242 4242" --expiry 02/27 --cvv 123
//! ```
//!
//! # Environment Variables
//!
//! - `SUPERLIAN_API_URL` - Base URL of the commerce backend (required)
//! - `SUPERLIAN_STATE_DIR` - Where tokens and snapshots persist (default: .superlian)

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's output is its interface
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, cart, checkout, orders, products, wishlist};

#[derive(Parser)]
#[command(name = "sl-cli")]
#[command(author, version, about = "SuperLian storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog with filters
    Products(products::ProductsArgs),
    /// List product categories
    Categories,
    /// Manage the authenticated session
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Show order history, or one order by ID
    Orders {
        /// Order ID
        id: Option<i32>,
    },
    /// Place an order from the current cart
    Checkout(checkout::CheckoutArgs),
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<wishlist::WishlistAction>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing (RUST_LOG controls verbosity; default to warnings
    // so command output stays clean)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = commands::storefront()?;

    let result = match cli.command {
        Commands::Products(args) => products::list(&store, &args).await,
        Commands::Categories => products::categories(&store).await,
        Commands::Auth { action } => auth::run(&store, action).await,
        Commands::Cart { action } => cart::run(&store, action).await,
        Commands::Orders { id } => orders::run(&store, id).await,
        Commands::Checkout(args) => checkout::run(&store, &args).await,
        Commands::Wishlist { action } => wishlist::run(&store, action).await,
    };

    // Surface whatever the client queued for the user, success or failure
    for notice in store.take_notices() {
        println!("! {}", notice.message);
    }

    result?;
    Ok(())
}

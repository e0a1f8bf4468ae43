//! Sweet Shop CLI - a command-line frontend for the Sweet Shop API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in
//! sweet-shop auth register -e customer@example.com
//! sweet-shop auth login -e customer@example.com
//!
//! # Browse and buy
//! sweet-shop sweets list --category chocolate
//! sweet-shop cart add <sweet-id> -q 2
//! sweet-shop cart checkout
//!
//! # Admin inventory management
//! sweet-shop sweets create -n "Fudge" -c chocolate -p 3.50 -q 20
//! ```
//!
//! # Commands
//!
//! - `auth` - register, login, logout, whoami
//! - `sweets` - list/show the catalog; create/update/delete (admin)
//! - `cart` - add, set, remove, show, clear, checkout
//! - `account` - profile, orders, change-password, delete
//!
//! # Environment Variables
//!
//! - `SWEET_SHOP_API_BASE_URL` - API base URL (default: `http://localhost:8000/api`)
//! - `SWEET_SHOP_API_TIMEOUT_MS` - request timeout (default: 15000)
//! - `SWEET_SHOP_DATA_DIR` - where session and cart state is persisted

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use sweet_shop_client::{ApiClient, ClientConfig, FileStorage, StorageAdapter, Store, TokenSlot};

mod commands;

use commands::{account, auth, cart, sweets};

#[derive(Parser)]
#[command(name = "sweet-shop")]
#[command(author, version, about = "Sweet Shop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Browse and manage the catalog
    Sweets {
        #[command(subcommand)]
        action: sweets::SweetsAction,
    },
    /// Manage the cart and check out
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Manage the signed-in account
    Account {
        #[command(subcommand)]
        action: account::AccountAction,
    },
}

/// Everything a command needs: the store and the API client, wired to the
/// same token slot. Built once here, passed down explicitly - there is no
/// global store.
pub struct Context {
    pub store: Store,
    pub client: ApiClient,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;

    let storage: Arc<dyn StorageAdapter> = Arc::new(FileStorage::new(config.data_dir.clone()));
    let token_slot = TokenSlot::new(Arc::clone(&storage));
    let store = Store::new(storage, token_slot.clone());
    let client = ApiClient::new(&config, token_slot)?;

    let ctx = Context { store, client };

    match cli.command {
        Commands::Auth { action } => auth::run(&ctx, action).await?,
        Commands::Sweets { action } => sweets::run(&ctx, action).await?,
        Commands::Cart { action } => cart::run(&ctx, action).await?,
        Commands::Account { action } => account::run(&ctx, action).await?,
    }
    Ok(())
}

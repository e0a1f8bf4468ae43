//! Catalog browsing and admin inventory commands.
//!
//! # Usage
//!
//! ```bash
//! sweet-shop sweets list --search fudge --category chocolate
//! sweet-shop sweets show <id>
//!
//! # Admin only
//! sweet-shop sweets create -n "Fudge" -c chocolate -p 3.50 -q 20
//! sweet-shop sweets update <id> --price 2.99
//! sweet-shop sweets delete <id>
//! ```

use clap::Subcommand;
use rust_decimal::Decimal;
use thiserror::Error;

use sweet_shop_client::api::types::CreateSweet;
use sweet_shop_client::{user_message, ApiError};
use sweet_shop_core::{Price, PriceError, Sweet, SweetId, SweetPatch};

use crate::Context;

/// Errors from the sweets commands.
#[derive(Debug, Error)]
pub enum SweetsCommandError {
    /// Price argument did not parse as a decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] rust_decimal::Error),

    /// Price argument was negative.
    #[error("Invalid price: {0}")]
    NegativePrice(#[from] PriceError),

    /// The API rejected the request.
    #[error("{}", user_message(.0))]
    Api(#[from] ApiError),
}

#[derive(Subcommand)]
pub enum SweetsAction {
    /// List the catalog
    List {
        /// Only show sweets whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only show sweets in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one sweet
    Show {
        /// Sweet ID
        id: String,
    },
    /// Create a sweet (admin)
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Unit price, e.g. 3.50
        #[arg(short, long)]
        price: String,

        /// Initial stock level
        #[arg(short, long)]
        quantity: u32,

        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Update a sweet's fields (admin)
    Update {
        /// Sweet ID
        id: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New category label
        #[arg(short, long)]
        category: Option<String>,

        /// New unit price
        #[arg(short, long)]
        price: Option<String>,

        /// New stock level
        #[arg(short, long)]
        quantity: Option<u32>,

        /// New image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a sweet (admin)
    Delete {
        /// Sweet ID
        id: String,
    },
}

pub async fn run(ctx: &Context, action: SweetsAction) -> Result<(), SweetsCommandError> {
    match action {
        SweetsAction::List { search, category } => {
            ctx.store.set_loading(true);
            let result = ctx.client.list_sweets().await;
            ctx.store.set_loading(false);

            let sweets = match result {
                Ok(sweets) => sweets,
                Err(e) => {
                    ctx.store.set_error(Some(user_message(&e)));
                    return Err(e.into());
                }
            };
            ctx.store.set_catalog(sweets);

            // Client-side filtering, like the storefront's search box
            let state = ctx.store.state();
            let shown: Vec<&Sweet> = state
                .catalog
                .iter()
                .filter(|s| {
                    search.as_deref().is_none_or(|needle| {
                        s.name.to_lowercase().contains(&needle.to_lowercase())
                    })
                })
                .filter(|s| {
                    category
                        .as_deref()
                        .is_none_or(|c| s.category.eq_ignore_ascii_case(c))
                })
                .collect();

            tracing::info!("{} sweet(s)", shown.len());
            for sweet in shown {
                print_sweet(sweet);
            }
        }
        SweetsAction::Show { id } => {
            let sweet = ctx.client.get_sweet(&SweetId::new(id)).await?;
            print_sweet(&sweet);
        }
        SweetsAction::Create {
            name,
            category,
            price,
            quantity,
            image_url,
        } => {
            let price = Price::new(price.parse::<Decimal>()?)?;
            let created = ctx
                .client
                .create_sweet(&CreateSweet {
                    name,
                    category,
                    price,
                    quantity,
                    image_url,
                })
                .await?;
            ctx.store.add_sweet(created.clone());
            tracing::info!("Created {} ({})", created.name, created.id);
        }
        SweetsAction::Update {
            id,
            name,
            category,
            price,
            quantity,
            image_url,
        } => {
            let price = price
                .map(|p| Ok::<_, SweetsCommandError>(Price::new(p.parse::<Decimal>()?)?))
                .transpose()?;
            let patch = SweetPatch {
                name,
                category,
                price,
                quantity,
                image_url,
            };
            let id = SweetId::new(id);
            let updated = ctx.client.update_sweet(&id, &patch).await?;
            ctx.store.update_sweet(id, patch);
            tracing::info!("Updated {} ({})", updated.name, updated.id);
        }
        SweetsAction::Delete { id } => {
            let id = SweetId::new(id);
            ctx.client.delete_sweet(&id).await?;
            ctx.store.remove_sweet(id.clone());
            tracing::info!("Deleted {id}");
        }
    }
    Ok(())
}

fn print_sweet(sweet: &Sweet) {
    tracing::info!(
        "{}  {}  [{}]  {}  stock: {}",
        sweet.id,
        sweet.name,
        sweet.category,
        sweet.price,
        sweet.quantity
    );
}

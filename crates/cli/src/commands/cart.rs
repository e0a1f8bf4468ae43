//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! sweet-shop cart add <sweet-id> -q 2
//! sweet-shop cart set <sweet-id> 3
//! sweet-shop cart remove <sweet-id>
//! sweet-shop cart show
//! sweet-shop cart clear
//! sweet-shop cart checkout
//! ```

use clap::Subcommand;
use thiserror::Error;

use sweet_shop_client::{checkout, user_message, ApiError, CartChange};
use sweet_shop_core::SweetId;

use crate::Context;

/// Errors from the cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The API rejected the request.
    #[error("{}", user_message(.0))]
    Api(#[from] ApiError),
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Add a sweet to the cart
    Add {
        /// Sweet ID
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's exact quantity (0 removes it)
    Set {
        /// Sweet ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Sweet ID
        id: String,
    },
    /// Show the cart
    Show,
    /// Empty the cart
    Clear,
    /// Purchase every line in the cart
    Checkout,
}

pub async fn run(ctx: &Context, action: CartAction) -> Result<(), CartCommandError> {
    match action {
        CartAction::Add { id, quantity } => {
            // Snapshot the sweet now; cart lines freeze price and name at
            // add time.
            let sweet = ctx.client.get_sweet(&SweetId::new(id)).await?;
            let name = sweet.name.clone();
            ctx.store.add_to_cart(sweet, quantity);
            tracing::info!(
                "Added {quantity} x {name}; cart now holds {} item(s)",
                ctx.store.cart_item_count()
            );
        }
        CartAction::Set { id, quantity } => {
            match ctx.store.set_cart_quantity(&SweetId::new(id), quantity) {
                CartChange::Updated => tracing::info!("Quantity set to {quantity}"),
                CartChange::Removed => tracing::info!("Removed from cart"),
                CartChange::Absent => tracing::warn!("No such line in the cart"),
            }
        }
        CartAction::Remove { id } => {
            ctx.store.remove_from_cart(SweetId::new(id));
            tracing::info!("Removed from cart");
        }
        CartAction::Show => {
            let state = ctx.store.state();
            if state.cart.is_empty() {
                tracing::info!("Cart is empty");
            } else {
                for line in state.cart.lines() {
                    tracing::info!(
                        "{}  {} x {}  = ${}",
                        line.id,
                        line.quantity,
                        line.name,
                        line.total().round_dp(2)
                    );
                }
                tracing::info!(
                    "Total: {} item(s), ${}",
                    state.cart.item_count(),
                    state.cart.total().round_dp(2)
                );
            }
        }
        CartAction::Clear => {
            ctx.store.clear_cart();
            tracing::info!("Cart cleared");
        }
        CartAction::Checkout => {
            let outcomes = checkout(&ctx.client, &ctx.store).await;
            if outcomes.is_empty() {
                tracing::info!("Cart is empty, nothing to check out");
                return Ok(());
            }

            // One notification per line, success or failure
            for outcome in &outcomes {
                if outcome.succeeded() {
                    tracing::info!("{}", outcome.message());
                } else {
                    tracing::warn!("{}", outcome.message());
                }
            }

            let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
            if failed > 0 {
                tracing::warn!(
                    "{failed} line(s) failed and remain in the cart for retry"
                );
            }
        }
    }
    Ok(())
}

//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! sweet-shop account profile
//! sweet-shop account update-email -e new@example.com
//! sweet-shop account orders
//! sweet-shop account change-password --current <old> --new <new>
//! sweet-shop account delete --yes
//! ```

use clap::Subcommand;
use thiserror::Error;

use sweet_shop_client::api::types::UpdateProfile;
use sweet_shop_client::{user_message, ApiError};
use sweet_shop_core::{Email, EmailError};

use crate::Context;

/// Errors from the account commands.
#[derive(Debug, Error)]
pub enum AccountCommandError {
    /// Email failed structural validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Destructive action was not confirmed.
    #[error("Pass --yes to confirm account deletion")]
    NotConfirmed,

    /// The API rejected the request.
    #[error("{}", user_message(.0))]
    Api(#[from] ApiError),
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show the signed-in user's profile
    Profile,
    /// Change the account email
    UpdateEmail {
        /// New email address
        #[arg(short, long)]
        email: String,
    },
    /// Show past purchases
    Orders,
    /// Change the account password
    ChangePassword {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,
    },
    /// Delete the account
    Delete {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(ctx: &Context, action: AccountAction) -> Result<(), AccountCommandError> {
    match action {
        AccountAction::Profile => {
            let profile = ctx.client.get_profile().await?;
            tracing::info!(
                "{} (admin: {}, member since {})",
                profile.email,
                profile.is_admin,
                profile.created_at.date_naive()
            );
        }
        AccountAction::UpdateEmail { email } => {
            let email = Email::parse(&email)?;
            let profile = ctx
                .client
                .update_profile(&UpdateProfile { email: Some(email) })
                .await?;
            tracing::info!("Email updated to {}", profile.email);
        }
        AccountAction::Orders => {
            let orders = ctx.client.order_history().await?;
            if orders.is_empty() {
                tracing::info!("No orders yet");
            }
            for order in orders {
                tracing::info!(
                    "{}  {} x {}  on {}",
                    order.id,
                    order.quantity,
                    order.sweet_name,
                    order.created_at.date_naive()
                );
            }
        }
        AccountAction::ChangePassword { current, new } => {
            ctx.client.change_password(&current, &new).await?;
            tracing::info!("Password changed");
        }
        AccountAction::Delete { yes } => {
            if !yes {
                return Err(AccountCommandError::NotConfirmed);
            }
            ctx.client.delete_account().await?;
            ctx.store.logout();
            tracing::info!("Account deleted");
        }
    }
    Ok(())
}

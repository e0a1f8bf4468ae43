//! Cart checkout.
//!
//! The server only sells one sweet per purchase call, so checking out a
//! cart is a sequence of purchase requests, one line at a time. Lines are
//! independent: a 409 or 422 on one line must not roll back or block the
//! rest. The caller gets one [`CheckoutOutcome`] per line and no error ever
//! propagates out of [`checkout`].

use tracing::{info, warn};

use sweet_shop_core::{SweetId, SweetPatch};

use crate::api::ApiClient;
use crate::error::{user_message, ApiError};
use crate::store::Store;

/// The result of one cart line during checkout.
#[derive(Debug)]
pub struct CheckoutOutcome {
    /// The sweet that was purchased (or not).
    pub sweet_id: SweetId,
    /// Display name of the sweet, for notifications.
    pub name: String,
    /// Units requested.
    pub quantity: u32,
    /// The per-line result; the error is retained so callers can inspect
    /// the status as well as display [`message`](Self::message).
    pub result: Result<(), ApiError>,
}

impl CheckoutOutcome {
    /// Whether this line was purchased.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// A display message for this line's notification.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.result {
            Ok(()) => format!("Purchased {} x {}", self.quantity, self.name),
            Err(e) => format!("{}: {}", self.name, user_message(e)),
        }
    }
}

/// Purchase every cart line sequentially, one request at a time.
///
/// Successful lines are removed from the cart and the catalog stock is
/// updated from the server's receipt. Failed lines stay in the cart so the
/// user can retry or drop them. Returns one outcome per line, in cart
/// order.
pub async fn checkout(client: &ApiClient, store: &Store) -> Vec<CheckoutOutcome> {
    let lines = store.state().cart.lines().to_vec();
    let mut outcomes = Vec::with_capacity(lines.len());

    store.set_loading(true);

    for line in lines {
        let result = match client.purchase(&line.id, line.quantity).await {
            Ok(receipt) => {
                info!(
                    sweet = %line.name,
                    quantity = receipt.quantity_purchased,
                    "Purchase succeeded"
                );
                store.remove_from_cart(line.id.clone());
                store.update_sweet(line.id.clone(), SweetPatch::stock(receipt.sweet.quantity));
                Ok(())
            }
            Err(e) => {
                warn!(sweet = %line.name, error = %e, "Purchase failed");
                Err(e)
            }
        };

        outcomes.push(CheckoutOutcome {
            sweet_id: line.id,
            name: line.name,
            quantity: line.quantity,
            result,
        });
    }

    store.set_loading(false);

    outcomes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let ok = CheckoutOutcome {
            sweet_id: SweetId::new("s-1"),
            name: "Fudge".to_string(),
            quantity: 2,
            result: Ok(()),
        };
        assert!(ok.succeeded());
        assert_eq!(ok.message(), "Purchased 2 x Fudge");

        let err = CheckoutOutcome {
            sweet_id: SweetId::new("s-2"),
            name: "Toffee".to_string(),
            quantity: 1,
            result: Err(ApiError::Status {
                status: 409,
                detail: Some("Already sold out".to_string()),
            }),
        };
        assert!(!err.succeeded());
        assert_eq!(err.message(), "Toffee: Already sold out");
    }
}

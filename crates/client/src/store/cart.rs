//! Cart types and mutation rules.
//!
//! Invariants enforced here:
//! - at most one line per sweet id (adds merge by summing quantities)
//! - a line's quantity is always positive; setting it to zero removes the
//!   line
//! - insertion order is preserved for display
//! - line fields are a snapshot of the sweet at add time, not live-linked
//!   to the catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sweet_shop_core::{Price, Sweet, SweetId};

/// One pending purchase line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// ID of the sweet this line refers to.
    pub id: SweetId,
    /// Name frozen at add time.
    pub name: String,
    /// Category frozen at add time.
    pub category: String,
    /// Unit price frozen at add time.
    pub price: Price,
    /// Image URL frozen at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Units to purchase; always >= 1.
    pub quantity: u32,
}

impl CartLine {
    fn from_sweet(sweet: &Sweet, quantity: u32) -> Self {
        Self {
            id: sweet.id.clone(),
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price,
            image_url: sweet.image_url.clone(),
            quantity,
        }
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Result of a cart quantity update.
///
/// Setting a quantity to zero is a removal, not an error, and callers may
/// want to say so in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// The line's quantity was set.
    Updated,
    /// The line was removed (quantity reached zero).
    Removed,
    /// No line with that id exists; nothing happened.
    Absent,
}

/// The user's pending purchase selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` units of a sweet.
    ///
    /// If a line for the sweet already exists its quantity is incremented;
    /// otherwise a new line is appended with a snapshot of the sweet's
    /// fields.
    pub fn add(&mut self, sweet: &Sweet, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == sweet.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine::from_sweet(sweet, quantity));
        }
    }

    /// Set the exact quantity for a line; zero removes it.
    pub fn set_quantity(&mut self, id: &SweetId, quantity: u32) -> CartChange {
        let Some(pos) = self.lines.iter().position(|l| &l.id == id) else {
            return CartChange::Absent;
        };
        if quantity == 0 {
            self.lines.remove(pos);
            CartChange::Removed
        } else {
            if let Some(line) = self.lines.get_mut(pos) {
                line.quantity = quantity;
            }
            CartChange::Updated
        }
    }

    /// Remove the line for `id`, if present.
    pub fn remove(&mut self, id: &SweetId) {
        self.lines.retain(|l| &l.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sweet(id: &str, price_cents: i64, stock: u32) -> Sweet {
        Sweet {
            id: SweetId::new(id),
            name: format!("Sweet {id}"),
            category: "gummy".to_string(),
            price: Price::new(Decimal::new(price_cents, 2)).unwrap(),
            quantity: stock,
            image_url: None,
        }
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = Cart::default();
        let s = sweet("s-1", 1000, 5);
        cart.add(&s, 2);
        cart.add(&s, 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::default();
        cart.add(&sweet("s-2", 100, 5), 1);
        cart.add(&sweet("s-1", 100, 5), 1);
        cart.add(&sweet("s-2", 100, 5), 1);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["s-2", "s-1"]);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::default();
        let s = sweet("s-1", 100, 5);
        cart.add(&s, 2);

        assert_eq!(cart.set_quantity(&s.id, 0), CartChange::Removed);
        assert!(cart.is_empty());
        assert!(cart.lines().iter().all(|l| l.quantity > 0));
    }

    #[test]
    fn test_set_quantity_exact() {
        let mut cart = Cart::default();
        let s = sweet("s-1", 100, 5);
        cart.add(&s, 2);

        assert_eq!(cart.set_quantity(&s.id, 7), CartChange::Updated);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::default();
        assert_eq!(cart.set_quantity(&SweetId::new("ghost"), 3), CartChange::Absent);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_not_live_linked() {
        let mut cart = Cart::default();
        let mut s = sweet("s-1", 1000, 5);
        cart.add(&s, 1);

        // Catalog price changes after the add
        s.price = Price::new(Decimal::new(9999, 2)).unwrap();

        assert_eq!(
            cart.lines()[0].price,
            Price::new(Decimal::new(1000, 2)).unwrap()
        );
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::default();
        cart.add(&sweet("s-1", 250, 5), 2); // 5.00
        cart.add(&sweet("s-2", 100, 5), 3); // 3.00
        assert_eq!(cart.total(), Decimal::new(800, 2));
    }

    #[test]
    fn test_add_saturates_at_u32_max() {
        let mut cart = Cart::default();
        let s = sweet("s-1", 100, 5);
        cart.add(&s, u32::MAX);
        cart.add(&s, 2);

        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        cart.add(&sweet("s-1", 100, 5), 0);
        assert!(cart.is_empty());
    }
}

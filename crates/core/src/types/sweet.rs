//! Catalog entity types.

use serde::{Deserialize, Serialize};

use crate::types::id::SweetId;
use crate::types::price::Price;

/// A sweet in the shop catalog.
///
/// Catalog entries are owned by the remote API; the client holds them as
/// plain values and replaces or patches them from API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sweet {
    /// Unique catalog ID.
    pub id: SweetId,
    /// Display name.
    pub name: String,
    /// Free-form category label (e.g., "chocolate", "gummy").
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub quantity: u32,
    /// Optional product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Sweet {
    /// Whether the sweet can currently be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// A typed partial update for a [`Sweet`].
///
/// Replaces open-ended field merges with an explicit field list; `None`
/// means "leave unchanged". Used both for admin edit forms and for folding
/// purchase responses back into the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweetPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// New stock level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// New image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SweetPatch {
    /// A patch that only changes the stock level.
    #[must_use]
    pub fn stock(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    /// Apply this patch to a sweet in place.
    pub fn apply_to(&self, sweet: &mut Sweet) {
        if let Some(name) = &self.name {
            sweet.name.clone_from(name);
        }
        if let Some(category) = &self.category {
            sweet.category.clone_from(category);
        }
        if let Some(price) = self.price {
            sweet.price = price;
        }
        if let Some(quantity) = self.quantity {
            sweet.quantity = quantity;
        }
        if let Some(image_url) = &self.image_url {
            sweet.image_url = Some(image_url.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn fudge() -> Sweet {
        Sweet {
            id: SweetId::new("s-1"),
            name: "Fudge".to_string(),
            category: "chocolate".to_string(),
            price: Price::new(Decimal::new(350, 2)).unwrap(),
            quantity: 5,
            image_url: None,
        }
    }

    #[test]
    fn test_in_stock() {
        let mut sweet = fudge();
        assert!(sweet.in_stock());
        sweet.quantity = 0;
        assert!(!sweet.in_stock());
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut sweet = fudge();
        let patch = SweetPatch {
            name: Some("Dark Fudge".to_string()),
            quantity: Some(2),
            ..SweetPatch::default()
        };
        patch.apply_to(&mut sweet);

        assert_eq!(sweet.name, "Dark Fudge");
        assert_eq!(sweet.quantity, 2);
        assert_eq!(sweet.category, "chocolate");
        assert_eq!(sweet.price, Price::new(Decimal::new(350, 2)).unwrap());
    }

    #[test]
    fn test_stock_patch() {
        let mut sweet = fudge();
        SweetPatch::stock(4).apply_to(&mut sweet);
        assert_eq!(sweet.quantity, 4);
        assert_eq!(sweet.name, "Fudge");
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut sweet = fudge();
        SweetPatch::default().apply_to(&mut sweet);
        assert_eq!(sweet, fudge());
    }
}

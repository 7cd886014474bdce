//! Persisted cart line items and favorite entries.
//!
//! Both are stored as JSON arrays, one array per storage key, with camelCase
//! field names and prices as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product's entry in the cart.
///
/// `quantity` is at least 1 for as long as the line exists; the cart engine
/// deletes a line instead of letting its quantity reach zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "json_number")]
    pub unit_price: Decimal,
    pub image_ref: String,
    pub quantity: u32,
}

impl CartLine {
    /// Create a line holding a single unit of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            unit_price: product.unit_price,
            image_ref: product.image_ref,
            quantity: 1,
        }
    }

    /// `unit_price × quantity`, unrounded. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Membership record for a favorited product.
///
/// The presence of an entry is the favorited state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub product_id: ProductId,
    pub name: String,
    pub image_ref: String,
    #[serde(
        default,
        with = "json_number::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
}

impl From<Product> for FavoriteEntry {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            image_ref: product.image_ref,
            unit_price: Some(product.unit_price),
        }
    }
}

/// Serde adapter writing decimals as JSON numbers.
///
/// Reads integers, floats and numeric strings. Floats are converted through
/// their shortest round-trip text form, so `49.99` reads back as exactly
/// `49.99`.
mod json_number {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn to_decimal<E: serde::de::Error>(raw: Raw) -> Result<Decimal, E> {
        let text = match raw {
            Raw::Number(number) => number.to_string(),
            Raw::Text(text) => text,
        };
        Decimal::from_str(text.trim()).map_err(E::custom)
    }

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let number = f64::from_str(&value.to_string()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        to_decimal(Raw::deserialize(deserializer)?)
    }

    pub mod option {
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::Raw;

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<Raw>::deserialize(deserializer)?
                .map(super::to_decimal)
                .transpose()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn portal() -> Product {
        Product::new("4200", "Portal 2", Decimal::new(4999, 2), "portal.jpg")
    }

    #[test]
    fn test_cart_line_subtotal() {
        let mut line = CartLine::new(portal());
        line.quantity = 3;
        assert_eq!(line.subtotal(), Decimal::new(14_997, 2));
    }

    #[test]
    fn test_cart_line_subtotal_saturates() {
        let mut line = CartLine::new(Product::new("1", "Huge", Decimal::MAX, "huge.jpg"));
        line.quantity = 2;
        assert_eq!(line.subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_cart_line_json_layout() {
        let json = serde_json::to_value(CartLine::new(portal())).unwrap();
        assert_eq!(json["productId"], "4200");
        assert_eq!(json["name"], "Portal 2");
        assert!(json["unitPrice"].is_number());
        assert_eq!(json["imageRef"], "portal.jpg");
        assert_eq!(json["quantity"], 1);
    }

    #[test]
    fn test_cart_line_accepts_numeric_id() {
        let line: CartLine = serde_json::from_str(
            r#"{"productId":4200,"name":"Portal 2","unitPrice":50,"imageRef":"p.jpg","quantity":2}"#,
        )
        .unwrap();
        assert_eq!(line.product_id, ProductId::from("4200"));
        assert_eq!(line.unit_price, Decimal::from(50));
    }

    #[test]
    fn test_price_round_trips_exactly() {
        let line = CartLine::new(portal());
        let json = serde_json::to_string(&line).unwrap();
        let restored: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.unit_price, Decimal::new(4999, 2));
    }

    #[test]
    fn test_price_accepts_numeric_string() {
        let entry: FavoriteEntry = serde_json::from_str(
            r#"{"productId":"9","name":"Limbo","imageRef":"l.jpg","unitPrice":"59.00"}"#,
        )
        .unwrap();
        assert_eq!(entry.unit_price, Some(Decimal::from(59)));
    }

    #[test]
    fn test_favorite_entry_without_price() {
        let entry: FavoriteEntry =
            serde_json::from_str(r#"{"productId":"9","name":"Limbo","imageRef":"l.jpg"}"#)
                .unwrap();
        assert_eq!(entry.unit_price, None);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("unitPrice"));
    }

    #[test]
    fn test_favorite_entry_from_product() {
        let entry = FavoriteEntry::from(portal());
        assert_eq!(entry.product_id.as_str(), "4200");
        assert_eq!(entry.unit_price, Some(Decimal::new(4999, 2)));
    }
}

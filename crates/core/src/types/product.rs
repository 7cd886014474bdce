//! Purchasable product value type.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Image shown when the catalog has no background image for a game.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.png";

/// Highest unit price accepted from an affordance, in whole currency units.
pub const MAX_UNIT_PRICE: u32 = 1_000_000;

/// Digits allowed after the decimal point of a unit price.
pub const PRICE_SCALE: u32 = 2;

/// Errors that can occur when building a [`Product`] from raw affordance data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product id is absent or blank.
    #[error("product id is missing")]
    MissingId,
    /// The product name is absent or blank.
    #[error("product name is missing")]
    MissingName,
    /// The price is absent, not a number, or negative.
    #[error("invalid product price: {0:?}")]
    InvalidPrice(String),
    /// The price has more than two decimal places or exceeds [`MAX_UNIT_PRICE`].
    #[error("product price out of range: {0:?}")]
    PriceOutOfRange(String),
}

/// A product as offered by an add-to-cart or favorite affordance.
///
/// Constructed once at the view boundary and passed by value into the cart
/// and favorites engines.
///
/// ## Examples
///
/// ```
/// use jm_games_core::Product;
///
/// let product = Product::parse(Some("3498"), Some("GTA V"), Some("148.00"), None).unwrap();
/// assert_eq!(product.id.as_str(), "3498");
///
/// assert!(Product::parse(None, Some("GTA V"), Some("148.00"), None).is_err());
/// assert!(Product::parse(Some("3498"), Some("GTA V"), Some("abc"), None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identity.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price, never negative.
    pub unit_price: Decimal,
    /// Image URL or path.
    pub image_ref: String,
}

impl Product {
    /// Create a product from already-typed parts.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
        }
    }

    /// Validate raw affordance attributes into a `Product`.
    ///
    /// A missing or blank image falls back to [`PLACEHOLDER_IMAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The id is missing or blank
    /// - The name is missing or blank
    /// - The price is missing, not a decimal number, or negative
    /// - The price has more than two decimal places or exceeds [`MAX_UNIT_PRICE`]
    pub fn parse(
        id: Option<&str>,
        name: Option<&str>,
        price: Option<&str>,
        image: Option<&str>,
    ) -> Result<Self, ProductError> {
        let id = id
            .map(ProductId::new)
            .filter(|id| !id.is_empty())
            .ok_or(ProductError::MissingId)?;

        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ProductError::MissingName)?;

        let raw_price = price.map(str::trim).unwrap_or_default();
        let unit_price = Decimal::from_str(raw_price)
            .ok()
            .filter(|price| !price.is_sign_negative())
            .ok_or_else(|| ProductError::InvalidPrice(raw_price.to_owned()))?;
        let unit_price = Self::check_price(unit_price)?;

        let image_ref = image
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE);

        Ok(Self {
            id,
            name: name.to_owned(),
            unit_price,
            image_ref: image_ref.to_owned(),
        })
    }

    /// Check that `price` fits the storefront's price range and precision.
    ///
    /// Trailing zeros do not count as decimal places, so `148.000` passes.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::PriceOutOfRange`] for more than two decimal
    /// places or a price above [`MAX_UNIT_PRICE`], and
    /// [`ProductError::InvalidPrice`] for a negative price.
    pub fn check_price(price: Decimal) -> Result<Decimal, ProductError> {
        if price.is_sign_negative() {
            return Err(ProductError::InvalidPrice(price.to_string()));
        }
        if price.normalize().scale() > PRICE_SCALE || price > Decimal::from(MAX_UNIT_PRICE) {
            return Err(ProductError::PriceOutOfRange(price.to_string()));
        }
        Ok(price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_product() {
        let product = Product::parse(
            Some("3498"),
            Some(" Grand Theft Auto V "),
            Some("148.00"),
            Some("https://media.rawg.io/gta.jpg"),
        )
        .unwrap();

        assert_eq!(product.id, ProductId::from(3498_u64));
        assert_eq!(product.name, "Grand Theft Auto V");
        assert_eq!(product.unit_price, Decimal::new(14_800, 2));
        assert_eq!(product.image_ref, "https://media.rawg.io/gta.jpg");
    }

    #[test]
    fn test_parse_missing_image_uses_placeholder() {
        let product = Product::parse(Some("1"), Some("Portal"), Some("51"), Some("")).unwrap();
        assert_eq!(product.image_ref, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_parse_missing_id() {
        let err = Product::parse(Some("  "), Some("Portal"), Some("51"), None).unwrap_err();
        assert_eq!(err, ProductError::MissingId);
    }

    #[test]
    fn test_parse_missing_name() {
        let err = Product::parse(Some("1"), None, Some("51"), None).unwrap_err();
        assert_eq!(err, ProductError::MissingName);
    }

    #[test]
    fn test_parse_invalid_price() {
        let err = Product::parse(Some("1"), Some("Portal"), Some("NaN"), None).unwrap_err();
        assert_eq!(err, ProductError::InvalidPrice("NaN".to_string()));

        let err = Product::parse(Some("1"), Some("Portal"), Some("-3"), None).unwrap_err();
        assert!(matches!(err, ProductError::InvalidPrice(_)));

        let err = Product::parse(Some("1"), Some("Portal"), None, None).unwrap_err();
        assert!(matches!(err, ProductError::InvalidPrice(_)));
    }

    #[test]
    fn test_parse_price_out_of_range() {
        let err = Product::parse(
            Some("1"),
            Some("Portal"),
            Some("79228162514264337593543950335"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ProductError::PriceOutOfRange(_)));

        let err = Product::parse(Some("1"), Some("Portal"), Some("1000000.01"), None).unwrap_err();
        assert!(matches!(err, ProductError::PriceOutOfRange(_)));

        let err = Product::parse(Some("1"), Some("Portal"), Some("9.999"), None).unwrap_err();
        assert!(matches!(err, ProductError::PriceOutOfRange(_)));
    }

    #[test]
    fn test_parse_price_at_limits() {
        let product = Product::parse(Some("1"), Some("Portal"), Some("1000000"), None).unwrap();
        assert_eq!(product.unit_price, Decimal::from(MAX_UNIT_PRICE));

        let product = Product::parse(Some("1"), Some("Portal"), Some("148.000"), None).unwrap();
        assert_eq!(product.unit_price, Decimal::new(148, 0));

        let product = Product::parse(Some("1"), Some("Portal"), Some("0"), None).unwrap();
        assert_eq!(product.unit_price, Decimal::ZERO);
    }
}

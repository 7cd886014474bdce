//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as exact decimals everywhere and only rounded to two
//! places when formatted for display, so cart totals never accumulate
//! binary floating point error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display, rounded to two decimals (e.g., "R$ 149.97").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} {:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

/// Price for a catalog game.
///
/// The catalog carries no prices, so every game is priced at
/// `(id mod 100) + 50` currency units.
#[must_use]
pub fn simulated_price(game_id: u64) -> Decimal {
    Decimal::from(game_id % 100) + Decimal::from(50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_at_presentation() {
        let price = Price::from_amount(Decimal::new(149_970, 3));
        assert_eq!(price.display(), "R$ 149.97");

        let price = Price::new(Decimal::new(5, 0), CurrencyCode::USD);
        assert_eq!(price.display(), "$ 5.00");
    }

    #[test]
    fn test_simulated_price() {
        assert_eq!(simulated_price(3498), Decimal::from(148));
        assert_eq!(simulated_price(100), Decimal::from(50));
        assert_eq!(simulated_price(7), Decimal::from(57));
    }

    #[test]
    fn test_default_currency_is_brl() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::BRL);
        assert_eq!(CurrencyCode::default().symbol(), "R$");
    }
}

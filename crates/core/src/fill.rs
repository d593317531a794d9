//! The post-execution report for one leg of a trade.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable report describing one attempted execution leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub venue: String,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    /// Base-asset quantity.
    pub qty: Decimal,
    /// Quote-currency notional, rounded to 2 decimals.
    pub cost: Decimal,
    /// Quote-currency fee charged for this leg.
    pub fee: Decimal,
    /// Milliseconds since epoch.
    pub timestamp: i64,
    pub ok: bool,
}

impl Fill {
    /// Builds a fill, deriving `cost` (rounded to 2 decimals) and `ok` from
    /// `qty`/`price`.
    #[must_use]
    pub fn new(
        venue: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        price: Decimal,
        qty: Decimal,
        fee: Decimal,
        timestamp: i64,
    ) -> Self {
        let cost = (qty * price).round_dp(2);
        let ok = qty > Decimal::ZERO && price > Decimal::ZERO;
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
            side,
            price,
            qty,
            cost,
            fee,
            timestamp,
            ok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ok_requires_positive_price_and_qty() {
        let good = Fill::new("v1", "BTCUSDT", Side::Buy, dec!(30010), dec!(1), dec!(0), 0);
        assert!(good.ok);

        let zero_qty = Fill::new("v1", "BTCUSDT", Side::Buy, dec!(30010), dec!(0), dec!(0), 0);
        assert!(!zero_qty.ok);

        let zero_price = Fill::new("v1", "BTCUSDT", Side::Buy, dec!(0), dec!(1), dec!(0), 0);
        assert!(!zero_price.ok);
    }

    #[test]
    fn cost_rounds_to_two_decimals() {
        let fill = Fill::new(
            "v1",
            "BTCUSDT",
            Side::Buy,
            dec!(30010.333),
            dec!(0.1),
            dec!(0),
            0,
        );
        assert_eq!(fill.cost, dec!(3001.03));
    }

    #[test]
    fn side_opposite_round_trips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}

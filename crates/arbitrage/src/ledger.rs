//! Per-(venue, symbol) signed USD exposure (§4.D) and sizing-room queries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use arb_core::Side;

/// Magnitudes below this are treated as flat to avoid floating-point drift
/// from repeated `applyUpdate` calls.
const SNAP_EPSILON: Decimal = dec!(0.000001);

#[derive(Debug, Default)]
pub struct PositionLedger {
    exposure: HashMap<(String, String), Decimal>,
}

impl PositionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current signed USD exposure for `(venue, symbol)`, 0 if untouched.
    #[must_use]
    pub fn exposure(&self, venue: &str, symbol: &str) -> Decimal {
        self.exposure
            .get(&Self::key(venue, symbol))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Additional USD notional `venue` may take on `side` without exceeding
    /// `max_pos_usd` in absolute signed exposure. The formula is
    /// intentionally asymmetric: unwinding a position has up to
    /// `2 * max_pos_usd` of room because the first `max_pos_usd` flattens
    /// and the next opens the opposite exposure.
    #[must_use]
    pub fn remaining_room(
        &self,
        venue: &str,
        symbol: &str,
        side: Side,
        max_pos_usd: Decimal,
    ) -> Decimal {
        let cur = self.exposure(venue, symbol);
        match (side, cur >= Decimal::ZERO) {
            (Side::Buy, true) => (max_pos_usd - cur).max(Decimal::ZERO),
            (Side::Buy, false) => max_pos_usd - cur,
            (Side::Sell, true) => max_pos_usd + cur,
            (Side::Sell, false) => (max_pos_usd - cur.abs()).max(Decimal::ZERO),
        }
    }

    /// Adds `executed_usd` to exposure on a buy, subtracts on a sell; snaps
    /// the result to zero within [`SNAP_EPSILON`]. Returns the new exposure.
    pub fn apply_update(
        &mut self,
        venue: &str,
        symbol: &str,
        side: Side,
        executed_usd: Decimal,
    ) -> Decimal {
        let key = Self::key(venue, symbol);
        let cur = self.exposure.get(&key).copied().unwrap_or(Decimal::ZERO);
        let mut next = match side {
            Side::Buy => cur + executed_usd,
            Side::Sell => cur - executed_usd,
        };
        if next.abs() < SNAP_EPSILON {
            next = Decimal::ZERO;
        }
        self.exposure.insert(key, next);
        next
    }

    fn key(venue: &str, symbol: &str) -> (String, String) {
        (venue.to_string(), symbol.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pair_has_full_room_both_sides() {
        let ledger = PositionLedger::new();
        let max_pos = dec!(1000);
        assert_eq!(
            ledger.remaining_room("v1", "BTCUSDT", Side::Buy, max_pos),
            dec!(1000)
        );
        assert_eq!(
            ledger.remaining_room("v1", "BTCUSDT", Side::Sell, max_pos),
            dec!(1000)
        );
    }

    #[test]
    fn buy_then_sell_same_amount_returns_to_flat() {
        let mut ledger = PositionLedger::new();
        ledger.apply_update("v1", "BTCUSDT", Side::Buy, dec!(500));
        let back = ledger.apply_update("v1", "BTCUSDT", Side::Sell, dec!(500));
        assert_eq!(back, Decimal::ZERO);
    }

    #[test]
    fn room_sums_to_at_least_max_pos_usd() {
        let mut ledger = PositionLedger::new();
        let max_pos = dec!(1000);
        ledger.apply_update("v1", "BTCUSDT", Side::Buy, dec!(400));
        let buy_room = ledger.remaining_room("v1", "BTCUSDT", Side::Buy, max_pos);
        let sell_room = ledger.remaining_room("v1", "BTCUSDT", Side::Sell, max_pos);
        assert!(buy_room + sell_room >= max_pos);
    }

    #[test]
    fn unwinding_a_long_has_double_room_on_the_sell_side() {
        let mut ledger = PositionLedger::new();
        let max_pos = dec!(1000);
        ledger.apply_update("v1", "BTCUSDT", Side::Buy, dec!(1000));
        assert_eq!(ledger.exposure("v1", "BTCUSDT"), dec!(1000));
        let sell_room = ledger.remaining_room("v1", "BTCUSDT", Side::Sell, max_pos);
        assert_eq!(sell_room, dec!(2000));
        let buy_room = ledger.remaining_room("v1", "BTCUSDT", Side::Buy, max_pos);
        assert_eq!(buy_room, Decimal::ZERO);
    }

    #[test]
    fn tiny_residuals_snap_to_zero() {
        let mut ledger = PositionLedger::new();
        ledger.apply_update("v1", "BTCUSDT", Side::Buy, dec!(0.0000001));
        assert_eq!(ledger.exposure("v1", "BTCUSDT"), Decimal::ZERO);
    }
}

//! Simulated execution at a reference price, never against a live book
//! (§4.C). Stateless besides its `(venue, feePercent)`.

use arb_core::{Fill, Side, TradeExecutor};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Instant;

pub struct PaperExecutor {
    venue: String,
    fee_percent: Decimal,
    /// Anchor for deriving monotonic fill timestamps (§4.C: "current
    /// monotonic time in ms"). `start_epoch_ms` is sampled once from the
    /// wall clock at construction; every fill adds `Instant::elapsed()` to
    /// it, so timestamps can never jump backwards from an NTP step the way
    /// a raw `SystemTime`/`Utc::now()` read could.
    start_instant: Instant,
    start_epoch_ms: i64,
}

impl PaperExecutor {
    #[must_use]
    pub fn new(venue: impl Into<String>, fee_percent: Decimal) -> Self {
        Self {
            venue: venue.into(),
            fee_percent,
            start_instant: Instant::now(),
            start_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[async_trait]
impl TradeExecutor for PaperExecutor {
    /// Always fills the full requested size at `price`, or not at all — a
    /// paper fill never partials.
    async fn execute_trade(
        &self,
        symbol: &str,
        side: Side,
        price: Decimal,
        max_qty: Decimal,
    ) -> Fill {
        let qty = max_qty;
        let fee = (qty * price) * (self.fee_percent / Decimal::ONE_HUNDRED);
        let timestamp = self.start_epoch_ms + self.start_instant.elapsed().as_millis() as i64;
        Fill::new(&self.venue, symbol, side, price, qty, fee, timestamp)
    }

    fn venue_name(&self) -> &str {
        &self.venue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn fills_full_size_at_reference_price() {
        let executor = PaperExecutor::new("v1", Decimal::ZERO);
        let fill = executor
            .execute_trade("BTCUSDT", Side::Buy, dec!(30010), dec!(1))
            .await;
        assert!(fill.ok);
        assert_eq!(fill.qty, dec!(1));
        assert_eq!(fill.cost, dec!(30010));
    }

    #[tokio::test]
    async fn charges_flat_percentage_fee() {
        let executor = PaperExecutor::new("v1", dec!(0.04));
        let fill = executor
            .execute_trade("BTCUSDT", Side::Buy, dec!(30000), dec!(1))
            .await;
        assert_eq!(fill.fee, dec!(12.0000));
    }

    #[tokio::test]
    async fn zero_qty_request_is_not_ok() {
        let executor = PaperExecutor::new("v1", Decimal::ZERO);
        let fill = executor
            .execute_trade("BTCUSDT", Side::Buy, dec!(30010), Decimal::ZERO)
            .await;
        assert!(!fill.ok);
    }
}

//! The capability sets the scanner registers against (§9). Concrete feeds and
//! executors live in their own crates; this crate only fixes the contract.

use crate::error::FeedError;
use crate::fill::{Fill, Side};
use crate::orderbook::OrderBook;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A venue's market-data connection lifecycle. One implementation per wire
/// dialect; the scanner only ever sees this trait object.
#[async_trait]
pub trait ExchangeFeed: Send + Sync {
    /// Opens the underlying transport. Idempotent once connected.
    async fn connect(&self) -> Result<(), FeedError>;

    /// Tears down every channel and returns the feed to `Idle`.
    async fn disconnect(&self);

    /// Subscribes to `symbol`, creating its `OrderBook` if absent. Rejected
    /// with `FeedError::SubscribeBeforeConnect` if called before `connect`.
    async fn subscribe(&self, symbol: &str) -> Result<(), FeedError>;

    /// The shared, read-only handle to a subscribed symbol's book.
    fn order_book(&self, symbol: &str) -> Option<Arc<OrderBook>>;

    /// Stable venue identifier used in logs, the ledger, and fills.
    fn venue_name(&self) -> &str;
}

/// Converts an intended trade into an execution report (§4.C). Implemented
/// by `PaperExecutor` today; a live executor is an additional
/// implementation registered the same way.
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    async fn execute_trade(
        &self,
        symbol: &str,
        side: Side,
        price: Decimal,
        max_qty: Decimal,
    ) -> Fill;

    fn venue_name(&self) -> &str;
}

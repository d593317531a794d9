//! Periodic cross-venue scan, opportunity sizing, two-leg execution, and PnL
//! accounting (§4.E).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use arb_core::{BookSide, LogSink, OrderBook, Side, TradeExecutor};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::ledger::PositionLedger;

/// One registered venue: its order book for a symbol plus its executor.
struct VenueHandle {
    venue: String,
    book: Arc<OrderBook>,
    executor: Arc<dyn TradeExecutor>,
}

pub struct ArbitrageScanner {
    symbols: Vec<String>,
    venues: HashMap<String, Vec<VenueHandle>>,
    max_pos_usd: Decimal,
    min_spread_percent: Decimal,
    #[allow(dead_code)]
    rebalance_min_spread: Decimal,
    check_interval: Duration,
    ledger: PositionLedger,
    pnl: HashMap<String, Decimal>,
    log: Arc<dyn LogSink>,
}

impl ArbitrageScanner {
    #[must_use]
    pub fn new(
        symbols: Vec<String>,
        max_pos_usd: Decimal,
        min_spread_percent: Decimal,
        rebalance_min_spread: Decimal,
        check_interval: Duration,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            symbols,
            venues: HashMap::new(),
            max_pos_usd,
            min_spread_percent,
            rebalance_min_spread,
            check_interval,
            ledger: PositionLedger::new(),
            pnl: HashMap::new(),
            log,
        }
    }

    /// Registers a venue's book and executor for `symbol`. Called once per
    /// (venue, symbol) during startup wiring.
    pub fn register_venue(
        &mut self,
        symbol: &str,
        venue: impl Into<String>,
        book: Arc<OrderBook>,
        executor: Arc<dyn TradeExecutor>,
    ) {
        self.venues.entry(symbol.to_string()).or_default().push(VenueHandle {
            venue: venue.into(),
            book,
            executor,
        });
    }

    #[must_use]
    pub fn pnl(&self, symbol: &str) -> Decimal {
        self.pnl.get(symbol).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn exposure(&self, venue: &str, symbol: &str) -> Decimal {
        self.ledger.exposure(venue, symbol)
    }

    /// Runs the scanner loop for the process lifetime, sleeping
    /// `check_interval` between passes over every configured symbol.
    pub async fn run(&mut self) {
        let mut interval = tokio::time::interval(self.check_interval);
        loop {
            interval.tick().await;
            let symbols = self.symbols.clone();
            for symbol in &symbols {
                self.check_arbitrage(symbol).await;
            }
        }
    }

    /// One pass of the ten-step check for `symbol` (§4.E). Returns early at
    /// any step that rules out a trade.
    pub async fn check_arbitrage(&mut self, symbol: &str) {
        let Some(venues) = self.venues.get(symbol) else {
            return;
        };

        // 1. Aggregate best prices across venues.
        let mut best_bid = Decimal::ZERO;
        let mut best_bid_qty = Decimal::ZERO;
        let mut bid_venue: Option<usize> = None;
        let mut best_ask = Decimal::MAX;
        let mut best_ask_qty = Decimal::ZERO;
        let mut ask_venue: Option<usize> = None;

        for (idx, handle) in venues.iter().enumerate() {
            let (bid_price, bid_qty) = handle.book.top_of_book(BookSide::Bid);
            if bid_price > best_bid {
                best_bid = bid_price;
                best_bid_qty = bid_qty;
                bid_venue = Some(idx);
            }
            let (ask_price, ask_qty) = handle.book.top_of_book(BookSide::Ask);
            if ask_price > Decimal::ZERO && ask_price < best_ask {
                best_ask = ask_price;
                best_ask_qty = ask_qty;
                ask_venue = Some(idx);
            }
        }

        // 2. Reject non-opportunities.
        if best_bid <= Decimal::ZERO || best_ask >= best_bid {
            return;
        }
        let (Some(bid_idx), Some(ask_idx)) = (bid_venue, ask_venue) else {
            return;
        };

        // 3. Spread gate (rebalance branch is a deliberate no-op, §9).
        let spread_pct = (best_bid - best_ask) / best_ask * dec!(100);
        if spread_pct <= self.min_spread_percent {
            return;
        }

        // 4. Resolve executors: buy where asks are cheapest, sell where bids
        // are richest.
        let buy_handle = &venues[ask_idx];
        let sell_handle = &venues[bid_idx];

        // 5. Size the trade as the minimum of four caps.
        let ob_cap = best_bid_qty.min(best_ask_qty);
        let buy_cap = self
            .ledger
            .remaining_room(&buy_handle.venue, symbol, Side::Buy, self.max_pos_usd)
            / best_ask;
        let sell_cap = self
            .ledger
            .remaining_room(&sell_handle.venue, symbol, Side::Sell, self.max_pos_usd)
            / best_bid;
        let qty = ob_cap.min(buy_cap).min(sell_cap).max(Decimal::ZERO);
        if qty <= Decimal::ZERO {
            return;
        }

        // 6. Execute both legs.
        let buy_fill = buy_handle
            .executor
            .execute_trade(symbol, Side::Buy, best_ask, qty)
            .await;
        let sell_fill = sell_handle
            .executor
            .execute_trade(symbol, Side::Sell, best_bid, qty)
            .await;
        if !buy_fill.ok || !sell_fill.ok {
            self.log.error(&format!(
                "{symbol}: leg rejected (buy.ok={} sell.ok={}), abandoning tick",
                buy_fill.ok, sell_fill.ok
            ));
            return;
        }

        // 7. Account for partials conservatively.
        let exec_usd = buy_fill.cost.min(sell_fill.cost);
        if exec_usd <= Decimal::ZERO {
            return;
        }

        // 8. Realize PnL.
        let gross = (sell_fill.price - buy_fill.price) / buy_fill.price * exec_usd;
        let net = gross - (buy_fill.fee + sell_fill.fee);
        let cumulative = self.pnl.entry(symbol.to_string()).or_insert(Decimal::ZERO);
        *cumulative += net;
        let cumulative = *cumulative;

        // 9. Update the ledger.
        let buy_exposure =
            self.ledger
                .apply_update(&buy_handle.venue, symbol, Side::Buy, buy_fill.cost);
        let sell_exposure =
            self.ledger
                .apply_update(&sell_handle.venue, symbol, Side::Sell, sell_fill.cost);

        // 10. Emit audit log.
        self.log.info(&format!(
            "{symbol}: buy {} @ {} sell {} @ {} spread={spread_pct:.4}% qty={qty} exec_usd={exec_usd} net={net} pnl={cumulative} exposure[{}]={buy_exposure} exposure[{}]={sell_exposure}",
            buy_handle.venue, best_ask, sell_handle.venue, best_bid, buy_handle.venue, sell_handle.venue
        ));
    }
}

//! Thread-safe bid/ask ladder for a single (venue, symbol) pair.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Which side of the book an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    Bid,
    Ask,
}

/// A single resting price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub qty: Decimal,
}

struct Ladder {
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
}

impl Ladder {
    fn empty() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }
}

/// A venue/symbol order book. Writes come from a single owning feed; reads
/// are shared freely. Every operation below takes the lock exactly once, so
/// a `top_of_book` read never pairs a fresh price with a stale quantity.
pub struct OrderBook {
    venue: String,
    symbol: String,
    ladder: RwLock<Ladder>,
}

impl OrderBook {
    #[must_use]
    pub fn new(venue: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
            ladder: RwLock::new(Ladder::empty()),
        }
    }

    #[must_use]
    pub fn venue(&self) -> &str {
        &self.venue
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// `qty == 0` removes the level; otherwise inserts-or-replaces it.
    pub fn update_bid(&self, price: Decimal, qty: Decimal) {
        Self::apply(&mut self.ladder.write().bids, price, qty);
    }

    pub fn update_ask(&self, price: Decimal, qty: Decimal) {
        Self::apply(&mut self.ladder.write().asks, price, qty);
    }

    fn apply(side: &mut BTreeMap<Decimal, Decimal>, price: Decimal, qty: Decimal) {
        if qty == Decimal::ZERO {
            side.remove(&price);
        } else {
            side.insert(price, qty);
        }
    }

    /// Highest resting bid, or `Decimal::ZERO` if the side is empty.
    #[must_use]
    pub fn top_bid_price(&self) -> Decimal {
        self.top_of_book(BookSide::Bid).0
    }

    #[must_use]
    pub fn top_bid_qty(&self) -> Decimal {
        self.top_of_book(BookSide::Bid).1
    }

    /// Lowest resting ask, or `Decimal::ZERO` if the side is empty.
    #[must_use]
    pub fn top_ask_price(&self) -> Decimal {
        self.top_of_book(BookSide::Ask).0
    }

    #[must_use]
    pub fn top_ask_qty(&self) -> Decimal {
        self.top_of_book(BookSide::Ask).1
    }

    /// Atomic `(price, qty)` read of the top of one side. This is the
    /// accessor the scanner relies on so a fresh price is never paired with
    /// a stale quantity from a concurrent update.
    #[must_use]
    pub fn top_of_book(&self, side: BookSide) -> (Decimal, Decimal) {
        let ladder = self.ladder.read();
        let entry = match side {
            BookSide::Bid => ladder.bids.iter().next_back(),
            BookSide::Ask => ladder.asks.iter().next(),
        };
        entry.map_or((Decimal::ZERO, Decimal::ZERO), |(p, q)| (*p, *q))
    }

    /// Up to `n` levels from the best end of `side`. Bids descending by
    /// price, asks ascending. Only positive quantities are ever returned;
    /// the filter below is a defensive cross-check of the storage
    /// invariant, not a behavior callers should rely on seeing triggered.
    #[must_use]
    pub fn top_n(&self, side: BookSide, n: usize) -> Vec<PriceLevel> {
        let ladder = self.ladder.read();
        let levels: Box<dyn Iterator<Item = (&Decimal, &Decimal)>> = match side {
            BookSide::Bid => Box::new(ladder.bids.iter().rev()),
            BookSide::Ask => Box::new(ladder.asks.iter()),
        };
        levels
            .filter(|(_, q)| **q > Decimal::ZERO)
            .take(n)
            .map(|(p, q)| PriceLevel { price: *p, qty: *q })
            .collect()
    }

    /// Removes every level on both sides atomically. Called at the start of
    /// every snapshot application.
    pub fn clear(&self) {
        let mut ladder = self.ladder.write();
        ladder.bids.clear();
        ladder.asks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_book_has_zero_sentinel_top() {
        let book = OrderBook::new("v1", "BTCUSDT");
        assert_eq!(book.top_bid_price(), Decimal::ZERO);
        assert_eq!(book.top_ask_price(), Decimal::ZERO);
        assert_eq!(book.top_bid_qty(), Decimal::ZERO);
    }

    #[test]
    fn update_then_zero_leaves_book_unchanged() {
        let book = OrderBook::new("v1", "BTCUSDT");
        book.update_bid(dec!(100), dec!(1));
        book.update_bid(dec!(100), Decimal::ZERO);
        assert_eq!(book.top_bid_price(), Decimal::ZERO);
        assert!(book.top_n(BookSide::Bid, 10).is_empty());
    }

    #[test]
    fn bids_descend_asks_ascend() {
        let book = OrderBook::new("v1", "BTCUSDT");
        book.update_bid(dec!(99), dec!(2));
        book.update_bid(dec!(100), dec!(1));
        book.update_ask(dec!(101), dec!(1));
        book.update_ask(dec!(102), dec!(2));

        assert_eq!(book.top_bid_price(), dec!(100));
        assert_eq!(book.top_ask_price(), dec!(101));

        let bids = book.top_n(BookSide::Bid, 10);
        assert_eq!(bids[0].price, dec!(100));
        assert_eq!(bids[1].price, dec!(99));

        let asks = book.top_n(BookSide::Ask, 10);
        assert_eq!(asks[0].price, dec!(101));
        assert_eq!(asks[1].price, dec!(102));
    }

    #[test]
    fn snapshot_apply_is_idempotent() {
        let book = OrderBook::new("v1", "BTCUSDT");
        let apply = |b: &OrderBook| {
            b.clear();
            b.update_bid(dec!(100), dec!(1));
            b.update_bid(dec!(99), dec!(2));
            b.update_ask(dec!(101), dec!(1));
        };
        apply(&book);
        let first = (book.top_bid_price(), book.top_ask_price());
        apply(&book);
        let second = (book.top_bid_price(), book.top_ask_price());
        assert_eq!(first, second);
        assert_eq!(book.top_n(BookSide::Bid, 10).len(), 2);
    }

    #[test]
    fn delta_removes_and_adds_levels() {
        let book = OrderBook::new("v1", "BTCUSDT");
        book.update_bid(dec!(100), dec!(1));
        book.update_bid(dec!(99), dec!(2));

        // delta: remove 100, add 101
        book.update_bid(dec!(100), Decimal::ZERO);
        book.update_bid(dec!(101), dec!(3));

        assert_eq!(book.top_bid_price(), dec!(101));
        assert_eq!(book.top_bid_qty(), dec!(3));
        let remaining: Vec<_> = book.top_n(BookSide::Bid, 10).into_iter().map(|l| l.price).collect();
        assert_eq!(remaining, vec![dec!(101), dec!(99)]);
    }

    #[test]
    fn clear_empties_both_sides() {
        let book = OrderBook::new("v1", "BTCUSDT");
        book.update_bid(dec!(100), dec!(1));
        book.update_ask(dec!(101), dec!(1));
        book.clear();
        assert_eq!(book.top_bid_price(), Decimal::ZERO);
        assert_eq!(book.top_ask_price(), Decimal::ZERO);
    }

    #[test]
    fn top_n_never_returns_zero_qty_levels() {
        let book = OrderBook::new("v1", "BTCUSDT");
        book.update_bid(dec!(100), dec!(1));
        book.update_bid(dec!(99), dec!(0));
        assert_eq!(book.top_n(BookSide::Bid, 10).len(), 1);
    }
}

//! Wire parsing for Dialect A ("binance-style", §4.B): every message is a
//! full depth-5 snapshot, decimal strings for price and quantity, no
//! distinct delta message.

use arb_core::FeedError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default, rename = "b")]
    bids: Vec<[String; 2]>,
    #[serde(default, rename = "a")]
    asks: Vec<[String; 2]>,
}

/// A fully-parsed snapshot: every level replaces the book, it never merges.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthSnapshot {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

pub fn parse_snapshot(text: &str) -> Result<DepthSnapshot, FeedError> {
    let wire: WireMessage =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;

    let bids = parse_levels(&wire.bids)?;
    let asks = parse_levels(&wire.asks)?;
    Ok(DepthSnapshot { bids, asks })
}

fn parse_levels(raw: &[[String; 2]]) -> Result<Vec<(Decimal, Decimal)>, FeedError> {
    raw.iter()
        .map(|[price, qty]| {
            let price = Decimal::from_str(price)
                .map_err(|e| FeedError::Parse(format!("bad price {price}: {e}")))?;
            let qty = Decimal::from_str(qty)
                .map_err(|e| FeedError::Parse(format!("bad qty {qty}: {e}")))?;
            Ok((price, qty))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_bids_and_asks() {
        let msg = r#"{"b":[["30000","1.0"],["29990","2.0"]],"a":[["30010","1.0"]]}"#;
        let snap = parse_snapshot(msg).unwrap();
        assert_eq!(snap.bids, vec![(dec!(30000), dec!(1.0)), (dec!(29990), dec!(2.0))]);
        assert_eq!(snap.asks, vec![(dec!(30010), dec!(1.0))]);
    }

    #[test]
    fn missing_sides_default_to_empty() {
        let snap = parse_snapshot(r#"{"b":[["30000","1.0"]]}"#).unwrap();
        assert!(snap.asks.is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_snapshot("{not json").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn non_numeric_price_is_parse_error() {
        let err = parse_snapshot(r#"{"b":[["abc","1.0"]]}"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}

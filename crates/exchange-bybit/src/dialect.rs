//! Wire parsing for Dialect B ("bybit-style", §4.B): a subscribe handshake
//! followed by `snapshot` (clear-then-apply) or `delta` (incremental apply)
//! messages, decimal strings for price and quantity.

use arb_core::FeedError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub op: &'static str,
    pub args: [&'a str; 1],
}

impl<'a> SubscribeRequest<'a> {
    #[must_use]
    pub fn new(topic: &'a str) -> Self {
        Self {
            op: "subscribe",
            args: [topic],
        }
    }
}

#[must_use]
pub fn topic_for(symbol: &str) -> String {
    format!("orderbook.50.{}", symbol.to_uppercase())
}

#[derive(Debug, Deserialize)]
struct WireData {
    #[serde(default, rename = "b")]
    bids: Vec<[String; 2]>,
    #[serde(default, rename = "a")]
    asks: Vec<[String; 2]>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    topic: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    data: Option<WireData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DepthUpdate {
    Snapshot {
        bids: Vec<(Decimal, Decimal)>,
        asks: Vec<(Decimal, Decimal)>,
    },
    Delta {
        bids: Vec<(Decimal, Decimal)>,
        asks: Vec<(Decimal, Decimal)>,
    },
}

/// Parses one text frame. Returns `Ok(None)` for handshake acks or messages
/// whose topic does not match `expected_topic` — both are ignored, not
/// errors.
pub fn parse_message(
    text: &str,
    expected_topic: &str,
) -> Result<Option<DepthUpdate>, FeedError> {
    let wire: WireMessage =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;

    let Some(topic) = wire.topic.as_deref() else {
        return Ok(None);
    };
    if topic != expected_topic {
        return Ok(None);
    }

    let Some(data) = wire.data else {
        return Ok(None);
    };
    let bids = parse_levels(&data.bids)?;
    let asks = parse_levels(&data.asks)?;

    match wire.kind.as_deref() {
        Some("snapshot") => Ok(Some(DepthUpdate::Snapshot { bids, asks })),
        Some("delta") => Ok(Some(DepthUpdate::Delta { bids, asks })),
        _ => Ok(None),
    }
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
    fn topic_uppercases_symbol() {
        assert_eq!(topic_for("btcusdt"), "orderbook.50.BTCUSDT");
    }

    #[test]
    fn snapshot_message_parses() {
        let msg = r#"{"topic":"orderbook.50.BTCUSDT","type":"snapshot","data":{"b":[["30000","1"]],"a":[["30010","1"]]}}"#;
        let update = parse_message(msg, "orderbook.50.BTCUSDT").unwrap().unwrap();
        assert_eq!(
            update,
            DepthUpdate::Snapshot {
                bids: vec![(dec!(30000), dec!(1))],
                asks: vec![(dec!(30010), dec!(1))],
            }
        );
    }

    #[test]
    fn delta_message_parses() {
        let msg = r#"{"topic":"orderbook.50.BTCUSDT","type":"delta","data":{"b":[["100","0"],["101","3"]],"a":[]}}"#;
        let update = parse_message(msg, "orderbook.50.BTCUSDT").unwrap().unwrap();
        assert_eq!(
            update,
            DepthUpdate::Delta {
                bids: vec![(dec!(100), dec!(0)), (dec!(101), dec!(3))],
                asks: vec![],
            }
        );
    }

    #[test]
    fn mismatched_topic_is_ignored() {
        let msg = r#"{"topic":"orderbook.50.ETHUSDT","type":"snapshot","data":{"b":[],"a":[]}}"#;
        assert!(parse_message(msg, "orderbook.50.BTCUSDT").unwrap().is_none());
    }

    #[test]
    fn subscribe_ack_has_no_topic_and_is_ignored() {
        let msg = r#"{"success":true,"op":"subscribe"}"#;
        assert!(parse_message(msg, "orderbook.50.BTCUSDT").unwrap().is_none());
    }
}

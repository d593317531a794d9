//! Connection lifecycle for a Dialect B venue (§4.B): after channel open the
//! client sends a subscribe payload naming a topic; subsequent messages
//! carry `snapshot` (clear-then-apply) or `delta` (incremental apply).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arb_core::{ExchangeFeed, FeedError, LogSink, OrderBook};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::dialect::{parse_message, topic_for, DepthUpdate, SubscribeRequest};

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

struct Channel {
    task: JoinHandle<()>,
    generation: Arc<AtomicU64>,
}

pub struct BybitFeed {
    venue: String,
    ws_url: String,
    connected: AtomicBool,
    books: RwLock<HashMap<String, Arc<OrderBook>>>,
    channels: RwLock<HashMap<String, Channel>>,
    log: Arc<dyn LogSink>,
}

impl BybitFeed {
    #[must_use]
    pub fn new(venue: impl Into<String>, ws_url: impl Into<String>, log: Arc<dyn LogSink>) -> Self {
        Self {
            venue: venue.into(),
            ws_url: ws_url.into(),
            connected: AtomicBool::new(false),
            books: RwLock::new(HashMap::new()),
            channels: RwLock::new(HashMap::new()),
            log,
        }
    }
}

#[async_trait]
impl ExchangeFeed for BybitFeed {
    async fn connect(&self) -> Result<(), FeedError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let mut channels = self.channels.write();
        for (_, channel) in channels.drain() {
            channel.generation.fetch_add(1, Ordering::SeqCst);
            channel.task.abort();
        }
    }

    async fn subscribe(&self, symbol: &str) -> Result<(), FeedError> {
        if !self.connected.load(Ordering::SeqCst) {
            self.log.error(&format!("{}: subscribe({symbol}) before connect", self.venue));
            return Err(FeedError::SubscribeBeforeConnect);
        }

        let book = self
            .books
            .write()
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(OrderBook::new(self.venue.clone(), symbol)))
            .clone();

        let generation = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run_channel(
            self.venue.clone(),
            self.ws_url.clone(),
            symbol.to_string(),
            book,
            generation.clone(),
            self.log.clone(),
        ));

        let mut channels = self.channels.write();
        if let Some(old) = channels.insert(symbol.to_string(), Channel { task, generation }) {
            old.generation.fetch_add(1, Ordering::SeqCst);
            old.task.abort();
        }
        Ok(())
    }

    fn order_book(&self, symbol: &str) -> Option<Arc<OrderBook>> {
        self.books.read().get(symbol).cloned()
    }

    fn venue_name(&self) -> &str {
        &self.venue
    }
}

async fn run_channel(
    venue: String,
    url: String,
    symbol: String,
    book: Arc<OrderBook>,
    generation: Arc<AtomicU64>,
    log: Arc<dyn LogSink>,
) {
    let my_generation = generation.load(Ordering::SeqCst);
    let topic = topic_for(&symbol);

    loop {
        if generation.load(Ordering::SeqCst) != my_generation {
            return;
        }

        let mut stream = match connect_async(&url).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                log.error(&format!("{venue}/{symbol}: connect failed: {e}"));
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        let request = SubscribeRequest::new(&topic);
        let payload = match serde_json::to_string(&request) {
            Ok(p) => p,
            Err(e) => {
                log.error(&format!("{venue}/{symbol}: failed to encode subscribe: {e}"));
                return;
            }
        };
        if let Err(e) = stream.send(Message::Text(payload)).await {
            log.error(&format!("{venue}/{symbol}: subscribe send failed: {e}"));
            tokio::time::sleep(RECONNECT_DELAY).await;
            continue;
        }

        log.info(&format!("{venue}/{symbol}: streaming"));
        let (_, mut read) = stream.split();
        let mut closed = false;

        while let Some(msg) = read.next().await {
            if generation.load(Ordering::SeqCst) != my_generation {
                return;
            }
            match msg {
                Ok(Message::Text(text)) => match parse_message(&text, &topic) {
                    Ok(Some(DepthUpdate::Snapshot { bids, asks })) => {
                        book.clear();
                        for (price, qty) in bids {
                            book.update_bid(price, qty);
                        }
                        for (price, qty) in asks {
                            book.update_ask(price, qty);
                        }
                    }
                    Ok(Some(DepthUpdate::Delta { bids, asks })) => {
                        for (price, qty) in bids {
                            book.update_bid(price, qty);
                        }
                        for (price, qty) in asks {
                            book.update_ask(price, qty);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => log.error(&format!("{venue}/{symbol}: {e}")),
                },
                Ok(Message::Close(_)) => {
                    log.warn(&format!("{venue}/{symbol}: connection closed"));
                    closed = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    log.error(&format!("{venue}/{symbol}: transport error: {e}"));
                    closed = true;
                    break;
                }
            }
        }

        if !closed {
            log.warn(&format!("{venue}/{symbol}: stream ended"));
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

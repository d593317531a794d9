pub mod config;
pub mod config_loader;
pub mod error;
pub mod fill;
pub mod logsink;
pub mod orderbook;
pub mod traits;

pub use config::{Config, Mode};
pub use config_loader::ConfigLoader;
pub use error::{ArbError, FeedError};
pub use fill::{Fill, Side};
pub use logsink::{LogSink, TracingLogSink};
pub use orderbook::{BookSide, OrderBook, PriceLevel};
pub use traits::{ExchangeFeed, TradeExecutor};

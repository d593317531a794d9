pub mod dialect;
pub mod feed;

pub use feed::BinanceFeed;

//! Position ledger, paper executor, and the cross-venue arbitrage scanner.

pub mod ledger;
pub mod paper_executor;
pub mod scanner;

pub use ledger::PositionLedger;
pub use paper_executor::PaperExecutor;
pub use scanner::ArbitrageScanner;

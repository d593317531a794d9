use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Paper,
    Live,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Paper
    }
}

/// Immutable configuration bundle, constructed once at startup and passed
/// explicitly to every component that needs it. Nothing in this crate reads
/// process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub symbols: Vec<String>,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_fees")]
    pub fees: f64,

    #[serde(default = "default_max_pos_usd")]
    pub max_pos_usd: f64,

    #[serde(default = "default_min_spread_percent")]
    pub min_spread_percent: f64,

    #[serde(default = "default_rebalance_min_spread")]
    pub rebalance_min_spread: f64,

    #[serde(default = "default_check_interval_sec")]
    pub check_interval_sec: u64,
}

fn default_fees() -> f64 {
    0.04
}

fn default_max_pos_usd() -> f64 {
    1000.0
}

fn default_min_spread_percent() -> f64 {
    0.05
}

fn default_rebalance_min_spread() -> f64 {
    0.02
}

fn default_check_interval_sec() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            mode: Mode::default(),
            fees: default_fees(),
            max_pos_usd: default_max_pos_usd(),
            min_spread_percent: default_min_spread_percent(),
            rebalance_min_spread: default_rebalance_min_spread(),
            check_interval_sec: default_check_interval_sec(),
        }
    }
}

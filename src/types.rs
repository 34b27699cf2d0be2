//! Core domain types for trade inputs, computed outcomes, edits and insight state.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Investment,
    Quantity,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Investment => write!(f, "investment"),
            Mode::Quantity => write!(f, "quantity"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeInput {
    pub buy_price: f64,
    pub sell_price: f64,
    pub amount: f64,
    pub mode: Mode,
    // percent: 0.1 means 0.1%
    pub fee_percentage: f64,
}

impl Default for TradeInput {
    fn default() -> Self {
        Self {
            buy_price: 100.0,
            sell_price: 150.0,
            amount: 1000.0,
            mode: Mode::Investment,
            fee_percentage: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeResult {
    pub quantity: f64,
    pub initial_investment: f64,
    pub gross_sale: f64,
    pub buy_fee: f64,
    pub sell_fee: f64,
    pub total_fees: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub break_even_price: f64,
    pub is_profitable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeRegime {
    Normal,
    // rate >= 100%
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Investment,
    Fees,
    FinalValue { profitable: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapitalBar {
    pub name: &'static str,
    pub kind: BarKind,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    BuyPrice(f64),
    SellPrice(f64),
    Amount(f64),
    FeePercentage(f64),
    Mode(Mode),
    Reset,
    Analyze { label: Option<String> },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsightStatus {
    Idle,
    InFlight { request_id: u64 },
    Ready { text: String, at: DateTime<Local> },
    Failed,
}

//! Plain-text rendering of the live session for the console.

use std::fmt::Write as _;

use crate::calculator::fee_regime;
use crate::config::DisplayCfg;
use crate::types::{BarKind, FeeRegime, InsightStatus, TradeInput, TradeResult};
use crate::utils::{fmt_money, fmt_signed_money};

const BAR_WIDTH: usize = 32;

pub fn render_input(input: &TradeInput) -> String {
    format!(
        "mode={} amount={} buy={} sell={} fee={}%{}",
        input.mode,
        input.amount,
        input.buy_price,
        input.sell_price,
        input.fee_percentage,
        if input.sell_price > input.buy_price {
            "  (long scenario)"
        } else {
            "  (loss scenario)"
        }
    )
}

pub fn render_result(input: &TradeInput, result: Option<&TradeResult>, d: &DisplayCfg) -> String {
    let Some(r) = result else {
        return "Enter positive values to see results".to_string();
    };
    let m = d.money_decimals;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Net Profit / Loss   {}  ({:.2}% ROI)  {}",
        fmt_signed_money(r.net_profit, m),
        r.roi,
        if r.is_profitable { "PROFIT" } else { "LOSS" }
    );
    let _ = writeln!(
        out,
        "Total Return Value  {}  (after {} in fees: buy {} / sell {})",
        fmt_money(r.final_value(), m),
        fmt_money(r.total_fees, m),
        fmt_money(r.buy_fee, m),
        fmt_money(r.sell_fee, m)
    );
    let _ = write!(out, "Break-Even Price    {}", fmt_money(r.break_even_price, m));
    if fee_regime(input.fee_percentage) == FeeRegime::Degenerate || !r.break_even_price.is_finite() {
        let _ = write!(out, "  [degenerate: fee rate >= 100%]");
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Quantity {:.*} units | Initial Investment {} | Gross Sale {}",
        d.quantity_decimals,
        r.quantity,
        fmt_money(r.initial_investment, m),
        fmt_money(r.gross_sale, m)
    );
    out.push_str(&render_bars(r, m));
    out
}

/// Horizontal bar chart of investment, fees and final value.
pub fn render_bars(r: &TradeResult, decimals: usize) -> String {
    let bars = r.capital_breakdown();
    let max = bars
        .iter()
        .map(|b| b.amount.abs())
        .filter(|a| a.is_finite())
        .fold(0.0_f64, f64::max);
    let mut out = String::new();
    for b in bars {
        let len = if max > 0.0 && b.amount.is_finite() {
            ((b.amount.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = match b.kind {
            BarKind::Investment => '=',
            BarKind::Fees => '.',
            BarKind::FinalValue { profitable: true } => '+',
            BarKind::FinalValue { profitable: false } => '-',
        };
        let _ = writeln!(
            out,
            "  {:<12} {:<width$} {}",
            b.name,
            glyph.to_string().repeat(len),
            fmt_money(b.amount, decimals),
            width = BAR_WIDTH
        );
    }
    out
}

pub fn render_insight(status: &InsightStatus) -> String {
    match status {
        InsightStatus::Idle => "Insight: idle (type `analyze` to request one)".to_string(),
        InsightStatus::InFlight { .. } => "Insight: analyzing market scenario...".to_string(),
        InsightStatus::Ready { text, at } => format!("Insight [{}]: {}", at.format("%H:%M:%S"), text),
        InsightStatus::Failed => {
            "Insight: could not generate analysis. Check API key configuration.".to_string()
        }
    }
}

//! Trade outcome calculator. Pure and synchronous; safe to call from anywhere.

use crate::types::{BarKind, CapitalBar, FeeRegime, Mode, TradeInput, TradeResult};

/// `None` when `buy_price` or `amount` is not positive. Fees of 100% or more
/// pass through, leaving a non-finite or negative break-even.
pub fn compute(input: &TradeInput) -> Option<TradeResult> {
    if !is_positive(input.buy_price) || !is_positive(input.amount) {
        return None;
    }

    let (quantity, initial_investment) = match input.mode {
        Mode::Investment => (input.amount / input.buy_price, input.amount),
        Mode::Quantity => (input.amount, input.amount * input.buy_price),
    };

    let gross_sale = quantity * input.sell_price;
    let rate = input.fee_percentage / 100.0;

    let buy_fee = initial_investment * rate;
    let sell_fee = gross_sale * rate;
    let total_fees = buy_fee + sell_fee;

    let net_profit = gross_sale - initial_investment - total_fees;
    let roi = (net_profit / initial_investment) * 100.0;

    // Solve net_profit = 0 for the sell price:
    // q * p * (1 - rate) = investment * (1 + rate)
    let break_even_price = (initial_investment * (1.0 + rate)) / (quantity * (1.0 - rate));

    Some(TradeResult {
        quantity,
        initial_investment,
        gross_sale,
        buy_fee,
        sell_fee,
        total_fees,
        net_profit,
        roi,
        break_even_price,
        is_profitable: net_profit >= 0.0,
    })
}

fn is_positive(v: f64) -> bool {
    // false for NaN as well
    v > 0.0
}

pub fn fee_regime(fee_percentage: f64) -> FeeRegime {
    if fee_percentage / 100.0 >= 1.0 {
        FeeRegime::Degenerate
    } else {
        FeeRegime::Normal
    }
}

impl TradeResult {
    pub fn final_value(&self) -> f64 {
        self.gross_sale - self.total_fees
    }

    pub fn capital_breakdown(&self) -> [CapitalBar; 3] {
        [
            CapitalBar {
                name: "Investment",
                kind: BarKind::Investment,
                amount: self.initial_investment,
            },
            CapitalBar {
                name: "Fees",
                kind: BarKind::Fees,
                amount: self.total_fees,
            },
            CapitalBar {
                name: "Final Value",
                kind: BarKind::FinalValue {
                    profitable: self.is_profitable,
                },
                amount: self.final_value(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn input(buy: f64, sell: f64, amount: f64, mode: Mode, fee: f64) -> TradeInput {
        TradeInput {
            buy_price: buy,
            sell_price: sell,
            amount,
            mode,
            fee_percentage: fee,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_default_scenario() {
        let r = compute(&TradeInput::default()).unwrap();
        assert!(close(r.quantity, 10.0));
        assert!(close(r.initial_investment, 1000.0));
        assert!(close(r.gross_sale, 1500.0));
        assert!(close(r.buy_fee, 1.0));
        assert!(close(r.sell_fee, 1.5));
        assert!(close(r.total_fees, 2.5));
        assert!(close(r.net_profit, 497.5));
        assert!(close(r.roi, 49.75));
        assert!((r.break_even_price - 100.2002002).abs() < 1e-6);
        assert!(r.is_profitable);
    }

    #[test]
    fn test_loss_scenario() {
        let r = compute(&input(100.0, 90.0, 1000.0, Mode::Investment, 0.1)).unwrap();
        assert!(close(r.gross_sale, 900.0));
        assert!(close(r.total_fees, 1.9));
        assert!(close(r.net_profit, -101.9));
        assert!(!r.is_profitable);
        assert!(r.roi < 0.0);
    }

    #[test]
    fn test_net_profit_identity() {
        let cases = [
            input(100.0, 150.0, 1000.0, Mode::Investment, 0.1),
            input(3.7, 2.1, 55.0, Mode::Quantity, 0.25),
            input(0.0042, 0.0051, 12_345.0, Mode::Investment, 1.5),
            input(250.0, 0.0, 4.0, Mode::Quantity, 0.0),
        ];
        for c in cases {
            let r = compute(&c).unwrap();
            assert_eq!(
                r.net_profit,
                r.gross_sale - r.initial_investment - r.total_fees
            );
            assert_eq!(r.total_fees, r.buy_fee + r.sell_fee);
            assert_eq!(r.is_profitable, r.net_profit >= 0.0);
        }
    }

    #[test]
    fn test_mode_equivalence() {
        let buy = 37.5;
        let amount = 2_500.0;
        let by_capital = compute(&input(buy, 41.0, amount, Mode::Investment, 0.2)).unwrap();
        let by_units = compute(&input(buy, 41.0, amount / buy, Mode::Quantity, 0.2)).unwrap();
        assert!(close(by_capital.quantity, by_units.quantity));
        assert!(close(by_capital.initial_investment, by_units.initial_investment));
        assert!(close(by_capital.gross_sale, by_units.gross_sale));
        assert!(close(by_capital.total_fees, by_units.total_fees));
        assert!(close(by_capital.net_profit, by_units.net_profit));
        assert!(close(by_capital.roi, by_units.roi));
        assert!(close(by_capital.break_even_price, by_units.break_even_price));
        assert_eq!(by_capital.is_profitable, by_units.is_profitable);
    }

    #[test]
    fn test_break_even_round_trip() {
        for fee in [0.0, 0.1, 1.0, 5.0, 42.0, 99.0] {
            let first = compute(&input(120.0, 80.0, 900.0, Mode::Investment, fee)).unwrap();
            let at_be = compute(&input(
                120.0,
                first.break_even_price,
                900.0,
                Mode::Investment,
                fee,
            ))
            .unwrap();
            assert!(
                at_be.net_profit.abs() < 1e-6,
                "fee {fee}: net profit at break-even was {}",
                at_be.net_profit
            );
        }
    }

    #[test]
    fn test_net_profit_strictly_increasing_in_sell_price() {
        let mut prev = f64::NEG_INFINITY;
        for step in 0..50 {
            let sell = step as f64 * 7.5;
            let r = compute(&input(100.0, sell, 1000.0, Mode::Investment, 0.5)).unwrap();
            assert!(r.net_profit > prev);
            prev = r.net_profit;
        }
    }

    #[test]
    fn test_zero_fee() {
        let r = compute(&input(64.0, 70.0, 1000.0, Mode::Investment, 0.0)).unwrap();
        assert_eq!(r.total_fees, 0.0);
        assert!(close(r.break_even_price, r.initial_investment / r.quantity));
        assert!(close(r.break_even_price, 64.0));
    }

    #[test]
    fn test_zero_sell_price_is_total_loss() {
        let r = compute(&input(100.0, 0.0, 1000.0, Mode::Investment, 0.1)).unwrap();
        assert_eq!(r.gross_sale, 0.0);
        assert_eq!(r.sell_fee, 0.0);
        assert!(close(r.net_profit, -1001.0));
        assert!(!r.is_profitable);
    }

    #[test]
    fn test_non_positive_inputs_are_undefined() {
        assert!(compute(&input(0.0, 150.0, 1000.0, Mode::Investment, 0.1)).is_none());
        assert!(compute(&input(-5.0, 150.0, 1000.0, Mode::Investment, 0.1)).is_none());
        assert!(compute(&input(100.0, 150.0, 0.0, Mode::Quantity, 0.1)).is_none());
        assert!(compute(&input(100.0, 150.0, -1.0, Mode::Investment, 0.1)).is_none());
        assert!(compute(&input(f64::NAN, 150.0, 1000.0, Mode::Investment, 0.1)).is_none());
        assert!(compute(&input(100.0, 150.0, f64::NAN, Mode::Quantity, 0.1)).is_none());
    }

    #[test]
    fn test_full_fee_passes_through_non_finite_break_even() {
        let r = compute(&input(100.0, 150.0, 1000.0, Mode::Investment, 100.0)).unwrap();
        assert!(!r.break_even_price.is_finite());
        assert!(r.roi.is_finite());
        assert_eq!(fee_regime(100.0), FeeRegime::Degenerate);
    }

    #[test]
    fn test_fee_above_full_flips_break_even_sign() {
        let r = compute(&input(100.0, 150.0, 1000.0, Mode::Investment, 150.0)).unwrap();
        assert!(r.break_even_price < 0.0);
        assert_eq!(fee_regime(150.0), FeeRegime::Degenerate);
        assert_eq!(fee_regime(99.99), FeeRegime::Normal);
    }

    #[test]
    fn test_deterministic() {
        let i = input(13.37, 14.2, 777.0, Mode::Investment, 0.075);
        assert_eq!(compute(&i), compute(&i));
    }

    #[test]
    fn test_capital_breakdown() {
        let r = compute(&TradeInput::default()).unwrap();
        let bars = r.capital_breakdown();
        assert_eq!(bars[0].name, "Investment");
        assert!(close(bars[0].amount, 1000.0));
        assert!(close(bars[1].amount, 2.5));
        assert!(close(bars[2].amount, 1497.5));
        assert_eq!(bars[2].kind, BarKind::FinalValue { profitable: true });
    }
}

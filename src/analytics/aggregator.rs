//! Pairwise profit/loss over consecutive fills of the same symbol

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Trade;

/// Trades keyed by symbol.
pub type SymbolTradeGroup = BTreeMap<String, Vec<Trade>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub total_profit_loss: Decimal,
    pub total_investment: Decimal,
    /// Sum of positive deltas
    pub gross_profit: Decimal,
    /// Sum of the magnitudes of non-positive deltas
    pub gross_loss: Decimal,
    pub winning_trade_count: usize,
    pub total_trade_count: usize,
    pub win_rate: Decimal,
    pub profit_loss_percentage: Decimal,
}

/// Group trades by symbol, each group sorted oldest first.
pub fn group_by_symbol(trades: &[Trade]) -> SymbolTradeGroup {
    let mut groups: SymbolTradeGroup = BTreeMap::new();
    for trade in trades {
        groups
            .entry(trade.symbol.clone())
            .or_insert_with(Vec::new)
            .push(trade.clone());
    }
    for group in groups.values_mut() {
        group.sort_by_key(|t| t.timestamp);
    }
    groups
}

/// Compare every fill with the previous fill of the same symbol.
///
/// `delta = (price[i] - price[i-1]) * qty[i]` feeds the P&L and
/// `price[i-1] * qty[i]` the invested capital. The trade count is
/// `floor(n / 2)` over the whole input (one round trip per two fills), not
/// the number of comparisons made.
pub fn aggregate(trades: &[Trade]) -> AggregateResult {
    let mut result = AggregateResult {
        total_trade_count: trades.len() / 2,
        ..AggregateResult::default()
    };

    for group in group_by_symbol(trades).values() {
        for pair in group.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let delta = (curr.price - prev.price) * curr.quantity;

            result.total_profit_loss += delta;
            result.total_investment += prev.price * curr.quantity;

            if delta > Decimal::ZERO {
                result.gross_profit += delta;
                result.winning_trade_count += 1;
            } else {
                result.gross_loss -= delta;
            }
        }
    }

    if result.total_trade_count > 0 {
        result.win_rate = percentage(
            Decimal::from(result.winning_trade_count),
            Decimal::from(result.total_trade_count),
        );
    }
    if !result.total_investment.is_zero() {
        result.profit_loss_percentage = percentage(result.total_profit_loss, result.total_investment);
    }

    result
}

/// `part / whole * 100`, saturating at the `Decimal` bounds instead of overflowing.
fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() != whole.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

//! Text rendering of analysis results for the terminal

use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::analytics::{group_by_symbol, AggregateResult};
use crate::fetcher::SkippedSymbols;
use crate::models::{MarginAccount, Trade};
use crate::window::WindowMode;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Round a currency or percentage figure to two places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn money(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

pub struct SummaryReport<'a> {
    pub mode: WindowMode,
    pub aggregate: &'a AggregateResult,
    pub skipped: &'a SkippedSymbols,
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Summary", self.mode)?;
        write_figures(f, self.aggregate, self.skipped)
    }
}

/// Full analysis screen: mode header, then the latest-trade table, then the figures.
pub struct AnalysisReport<'a> {
    pub mode: WindowMode,
    pub rows: &'a [RecentTradeRow],
    pub aggregate: &'a AggregateResult,
    pub skipped: &'a SkippedSymbols,
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Summary", self.mode)?;
        writeln!(f, "{}", render_recent_trades(self.rows))?;
        write_figures(f, self.aggregate, self.skipped)
    }
}

fn write_figures(f: &mut fmt::Formatter<'_>, a: &AggregateResult, skipped: &SkippedSymbols) -> fmt::Result {
    writeln!(f, "Total Profit: ${}", money(a.gross_profit))?;
    writeln!(f, "Total Loss: ${}", money(a.gross_loss))?;
    writeln!(f, "Net Profit/Loss: ${}", money(a.total_profit_loss))?;
    writeln!(f, "Profit/Loss Percentage: {}%", money(a.profit_loss_percentage))?;
    writeln!(f, "Win Rate: {}%", money(a.win_rate))?;
    writeln!(f, "Total Trades: {}", a.total_trade_count)?;
    if skipped.is_empty() {
        write!(f, "Skipped Symbols: none")
    } else {
        write!(f, "Skipped Symbols: {}", skipped.as_slice().join(", "))
    }
}

/// Direction of the latest fill relative to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Gain,
    Loss,
    NoChange,
    NotApplicable,
}

impl TradeOutcome {
    pub fn between(previous: &Trade, latest: &Trade) -> Self {
        match latest.price.cmp(&previous.price) {
            std::cmp::Ordering::Greater => TradeOutcome::Gain,
            std::cmp::Ordering::Less => TradeOutcome::Loss,
            std::cmp::Ordering::Equal => TradeOutcome::NoChange,
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeOutcome::Gain => "Gain",
            TradeOutcome::Loss => "Loss",
            TradeOutcome::NoChange => "No Change",
            TradeOutcome::NotApplicable => "N/A",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTradeRow {
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub executed_at: String,
    pub outcome: TradeOutcome,
}

/// Most recent trade of every symbol, tagged against the trade before it.
pub fn latest_trade_rows(trades: &[Trade]) -> Vec<RecentTradeRow> {
    latest_trade_rows_in(trades, &Local)
}

pub fn latest_trade_rows_in<Tz>(trades: &[Trade], tz: &Tz) -> Vec<RecentTradeRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    group_by_symbol(trades)
        .into_iter()
        .filter_map(|(symbol, group)| {
            let latest = group.last()?;
            let outcome = match group.len() {
                0 | 1 => TradeOutcome::NotApplicable,
                n => TradeOutcome::between(&group[n - 2], latest),
            };
            let executed_at = latest
                .executed_at()
                .map(|ts| ts.with_timezone(tz).format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| latest.timestamp.to_string());

            Some(RecentTradeRow {
                symbol,
                price: latest.price,
                quantity: latest.quantity,
                executed_at,
                outcome,
            })
        })
        .collect()
}

pub fn render_recent_trades(rows: &[RecentTradeRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.symbol.clone(),
                r.price.normalize().to_string(),
                r.quantity.normalize().to_string(),
                r.executed_at.clone(),
                r.outcome.to_string(),
            ]
        })
        .collect();

    render_table(
        "Recent Trades",
        &["Symbol", "Price", "Quantity", "Time", "Result"],
        &body,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
    pub total: Decimal,
}

/// Assets with a non-zero balance, in account order.
pub fn balance_rows(account: &MarginAccount) -> Vec<BalanceRow> {
    account
        .user_assets
        .iter()
        .filter(|a| a.is_held())
        .map(|a| BalanceRow {
            asset: a.asset.clone(),
            free: a.free,
            locked: a.locked,
            total: a.total(),
        })
        .collect()
}

pub fn render_balances(rows: &[BalanceRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.asset.clone(),
                r.free.normalize().to_string(),
                r.locked.normalize().to_string(),
                r.total.normalize().to_string(),
            ]
        })
        .collect();

    render_table(
        "Margin Account Information",
        &["Asset", "Free", "Locked", "Total"],
        &body,
    )
}

/// Fixed-width table: first column left aligned, the rest right aligned.
fn render_table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = *w)
                } else {
                    format!("{:>width$}", cell, width = *w)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let header = format_row(&header_cells);
    let separator = "-".repeat(header.chars().count());

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&header);
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

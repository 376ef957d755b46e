//! Binance cross-margin trade tracker
//! P&L and win rate over a day / week / month window

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::io::{self, BufRead, Write};

use margin_tracker::config::resolve_tracker_config;
use margin_tracker::exchange::{BinanceClient, Credentials};
use margin_tracker::report::{
    balance_rows, latest_trade_rows, render_balances, render_recent_trades, AnalysisReport,
};
use margin_tracker::utils::logging::init_logging;
use margin_tracker::{AnalysisRun, Tracker};

#[derive(Parser)]
#[command(name = "margin-tracker", about = "Margin trade P&L and win-rate tracker")]
struct Args {
    /// YAML config file (default: config/tracker.yaml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Window: day, week, current-month (tmonth), last-month (lmonth)
    #[arg(short, long)]
    mode: Option<String>,

    /// Quote currency appended to every asset, e.g. USDT
    #[arg(short, long)]
    quote: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Show non-zero margin balances
    Account,
    /// Show the latest trade per symbol in the window
    Trades,
    /// Show recent trades and the P&L summary
    Analysis,
    /// Interactive menu (default)
    Menu,
}

fn main() -> Result<()> {
    dotenv().ok();
    init_logging();

    let args = Args::parse();

    let mut config = resolve_tracker_config(args.config.as_deref())?;
    config.apply_overrides(args.mode.as_deref(), args.quote.as_deref())?;

    let credentials = Credentials::from_env()?;
    let client = BinanceClient::new(credentials, &config)?;
    let mut tracker = Tracker::with_config(client, &config);

    match args.command.unwrap_or(Command::Menu) {
        Command::Account => show_account(&tracker)?,
        Command::Trades => show_recent_trades(&tracker)?,
        Command::Analysis => show_analysis(&tracker)?,
        Command::Menu => run_menu(&mut tracker)?,
    }

    Ok(())
}

fn show_account(tracker: &Tracker<BinanceClient>) -> Result<()> {
    println!("📡 Fetching margin account info...");
    let account = tracker.margin_account()?;
    println!("{}", render_balances(&balance_rows(&account)));
    Ok(())
}

fn fetch_run(tracker: &Tracker<BinanceClient>) -> Result<AnalysisRun> {
    println!("📡 Fetching margin account info...");
    let run = tracker.analyze(|done, total, _asset| {
        print!("\r📥 Fetching cross trades: {}/{}", done, total);
        let _ = io::stdout().flush();
    })?;
    println!();
    Ok(run)
}

fn show_recent_trades(tracker: &Tracker<BinanceClient>) -> Result<()> {
    let run = fetch_run(tracker)?;
    println!("{} Summary", run.mode);
    println!("{}", render_recent_trades(&latest_trade_rows(&run.recent_trades)));
    Ok(())
}

fn show_analysis(tracker: &Tracker<BinanceClient>) -> Result<()> {
    let run = fetch_run(tracker)?;
    let rows = latest_trade_rows(&run.recent_trades);
    println!(
        "{}",
        AnalysisReport {
            mode: run.mode,
            rows: &rows,
            aggregate: &run.aggregate,
            skipped: &run.skipped,
        }
    );
    Ok(())
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn run_menu(tracker: &mut Tracker<BinanceClient>) -> Result<()> {
    loop {
        println!("\nSelect an option ({}, quote {}):", tracker.mode(), tracker.quote_asset());
        println!("1. Display margin account info");
        println!("2. Display recent trades");
        println!("3. Display trade analysis");
        println!("4. Change interval");
        println!("5. Exit");

        let Some(choice) = prompt("Enter your choice: ")? else {
            return Ok(());
        };

        let outcome = match choice.as_str() {
            "1" => show_account(tracker),
            "2" => show_recent_trades(tracker),
            "3" => show_analysis(tracker),
            "4" => {
                let Some(input) =
                    prompt("Enter new interval (day, week, current-month, last-month): ")?
                else {
                    return Ok(());
                };
                match tracker.change_mode(&input) {
                    Ok(mode) => println!("✅ Interval changed to: {}", mode),
                    Err(e) => println!("❌ {} (keeping {})", e, tracker.mode()),
                }
                Ok(())
            }
            "5" => return Ok(()),
            other => {
                println!("⚠️ Unknown option: {}", other);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            eprintln!("❌ {}", e);
        }
    }
}

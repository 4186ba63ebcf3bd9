use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::reporting::{CategoryShare, DailyTotal, Summary, TimePoint};
use crate::application::{ExpenseService, LedgerError};
use crate::domain::{Category, Expense, Ledger, format_cents, format_cents_grouped, parse_cents};
use crate::storage::{DEFAULT_LEDGER_FILE, LedgerStore, StoreConfig, write_ledger};

/// Impensa - Personal Expense Logger
#[derive(Parser)]
#[command(name = "impensa")]
#[command(about = "A local-first personal expense logger with a terminal dashboard")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, env = "IMPENSA_FILE", default_value = DEFAULT_LEDGER_FILE)]
    pub file: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger file if it does not exist yet
    Init,

    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        amount: String,

        /// Category: food, travel, shopping, bills, entertainment, health, others
        #[arg(short, long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Optional notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Show every recorded expense
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Total spent and top category
    Summary {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Spending breakdown by category
    Categories {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Expenses over time
    Timeline {
        /// Sum expenses per day instead of listing each one
        #[arg(long)]
        daily: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

const BAR_WIDTH: usize = 30;

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = StoreConfig::new(&self.file);

        match self.command {
            Commands::Init => {
                LedgerStore::new(config).ensure_initialized()?;
                println!("Ledger initialized: {}", self.file.display());
            }

            Commands::Add {
                amount,
                category,
                date,
                notes,
            } => {
                let service = ExpenseService::open(config)?;
                let expense = build_expense(&amount, &category, date.as_deref(), notes)?;
                let amount_cents = expense.amount_cents;
                let category = expense.category;

                service
                    .record_expense(expense)
                    .map_err(|e| anyhow::anyhow!("Error saving expense: {}", e))?;

                println!(
                    "Expense added: {} {}",
                    format_cents(amount_cents),
                    category.label()
                );
            }

            Commands::List { format } => {
                let service = ExpenseService::open(config)?;
                let ledger = load_or_warn(service.list_expenses())?;
                print_ledger(&ledger, format)?;
            }

            Commands::Summary { format } => {
                let service = ExpenseService::open(config)?;
                let summary = load_or_warn(service.summary())?;
                print_summary(&summary, format)?;
            }

            Commands::Categories { format } => {
                let service = ExpenseService::open(config)?;
                let breakdown = load_or_warn(service.category_breakdown())?;
                print_breakdown(&breakdown, format)?;
            }

            Commands::Timeline { daily, format } => {
                let service = ExpenseService::open(config)?;
                if daily {
                    let days = load_or_warn(service.daily_totals())?;
                    print_daily(&days, format)?;
                } else {
                    let series = load_or_warn(service.time_series())?;
                    print_series(&series, format)?;
                }
            }
        }

        Ok(())
    }
}

/// Initialize the global tracing subscriber. Honors `RUST_LOG`; `verbose`
/// raises this crate's default level from `warn` to `debug`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose { "impensa=debug" } else { "impensa=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// An unreadable ledger aborts the command with a warning instead of a bare error.
fn load_or_warn<T>(result: Result<T, LedgerError>) -> Result<T> {
    result.map_err(|e| match e {
        LedgerError::StorageRead { .. } => {
            anyhow::anyhow!("Warning: ledger is unavailable: {}", e)
        }
        other => other.into(),
    })
}

fn build_expense(
    amount: &str,
    category: &str,
    date: Option<&str>,
    notes: String,
) -> Result<Expense> {
    let amount_cents =
        parse_cents(amount).context("Invalid amount format. Use '12.50' or '12'")?;

    let category = Category::parse_label(category).with_context(|| {
        format!(
            "Invalid category '{}'. Valid categories: {}",
            category,
            Category::ALL.map(|c| c.as_str()).join(", ")
        )
    })?;

    let date = match date {
        Some(date_str) => parse_date(date_str)?,
        None => Local::now().date_naive(),
    };

    Ok(Expense::new(date, amount_cents, category).with_notes(notes))
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn print_ledger(ledger: &Ledger, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(ledger)?);
        }
        OutputFormat::Csv => {
            let mut out = write_ledger(io::stdout().lock(), ledger)?;
            out.flush()?;
        }
        OutputFormat::Table => {
            if ledger.is_empty() {
                println!("No expenses recorded yet. Add one with `impensa add`.");
                return Ok(());
            }

            println!(
                "{:<12} {:>12} {:<16} NOTES",
                "DATE", "AMOUNT", "CATEGORY"
            );
            println!("{}", "-".repeat(70));
            for expense in ledger {
                println!(
                    "{:<12} {:>12} {:<16} {}",
                    expense.date.to_string(),
                    format_cents(expense.amount_cents),
                    expense.category.label(),
                    truncate(&expense.notes, 30)
                );
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &Summary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Csv => {
            println!("count,total_spent,top_category,top_category_total");
            println!(
                "{},{},{},{}",
                summary.count,
                format_cents(summary.total_spent),
                summary.top_category.map(|c| c.as_str()).unwrap_or_default(),
                summary
                    .top_category_total
                    .map(format_cents)
                    .unwrap_or_default()
            );
        }
        OutputFormat::Table => {
            let (Some(top), Some(top_total)) = (summary.top_category, summary.top_category_total)
            else {
                println!("No expenses recorded yet. Add one with `impensa add`.");
                return Ok(());
            };

            println!("Summary");
            println!();
            println!("  Total spent:        {}", format_cents_grouped(summary.total_spent));
            println!("  Top category:       {}", top.label());
            println!("  Max category spend: {}", format_cents_grouped(top_total));
            println!("  Expenses:           {}", summary.count);
        }
    }
    Ok(())
}

fn print_breakdown(breakdown: &[CategoryShare], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(breakdown)?);
        }
        OutputFormat::Csv => {
            println!("category,total,count,average,percentage");
            for share in breakdown {
                println!(
                    "{},{},{},{},{:.2}",
                    share.category,
                    format_cents(share.total),
                    share.count,
                    format_cents(share.average),
                    share.percentage
                );
            }
        }
        OutputFormat::Table => {
            if breakdown.is_empty() {
                println!("No expenses recorded yet. Add one with `impensa add`.");
                return Ok(());
            }

            println!(
                "{:<18} {:>12} {:>6} {:>8}  {}",
                "CATEGORY", "TOTAL", "COUNT", "PERCENT", "SHARE"
            );
            println!("{}", "-".repeat(50 + BAR_WIDTH));
            for share in breakdown {
                println!(
                    "{:<18} {:>12} {:>6} {:>7.1}%  {}",
                    share.category.label(),
                    format_cents_grouped(share.total),
                    share.count,
                    share.percentage,
                    bar(share.percentage)
                );
            }
        }
    }
    Ok(())
}

fn print_series(series: &[TimePoint], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(series)?);
        }
        OutputFormat::Csv => {
            println!("date,amount,category");
            for point in series {
                println!(
                    "{},{},{}",
                    point.date,
                    format_cents(point.amount),
                    point.category
                );
            }
        }
        OutputFormat::Table => {
            if series.is_empty() {
                println!("No expenses recorded yet. Add one with `impensa add`.");
                return Ok(());
            }

            println!("{:<12} {:>12} CATEGORY", "DATE", "AMOUNT");
            println!("{}", "-".repeat(44));
            for point in series {
                println!(
                    "{:<12} {:>12} {}",
                    point.date.to_string(),
                    format_cents(point.amount),
                    point.category.label()
                );
            }
        }
    }
    Ok(())
}

fn print_daily(days: &[DailyTotal], format: OutputFormat) -> Result<()> {
    let date_label = |day: &DailyTotal| {
        day.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| crate::domain::UNKNOWN_DATE.to_string())
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(days)?);
        }
        OutputFormat::Csv => {
            println!("date,total,count");
            for day in days {
                println!("{},{},{}", date_label(day), format_cents(day.total), day.count);
            }
        }
        OutputFormat::Table => {
            if days.is_empty() {
                println!("No expenses recorded yet. Add one with `impensa add`.");
                return Ok(());
            }

            let max = days.iter().map(|d| d.total).max().unwrap_or_default();
            println!("{:<12} {:>12} {:>6}  {}", "DATE", "TOTAL", "COUNT", "SPENT");
            println!("{}", "-".repeat(34 + BAR_WIDTH));
            for day in days {
                let percentage = if max > 0 {
                    day.total as f64 / max as f64 * 100.0
                } else {
                    0.0
                };
                println!(
                    "{:<12} {:>12} {:>6}  {}",
                    date_label(day),
                    format_cents_grouped(day.total),
                    day.count,
                    bar(percentage)
                );
            }
        }
    }
    Ok(())
}

/// Horizontal bar scaled so that 100% fills `BAR_WIDTH` cells.
fn bar(percentage: f64) -> String {
    let cells = (percentage / 100.0 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(cells.min(BAR_WIDTH))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

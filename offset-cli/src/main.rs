use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use offset_core::calculations::PerpetuityInput;
use offset_core::{Bill, InvestmentInput};
use rust_decimal::Decimal;
use tracing::{debug, info};

use offset_cli::app;
use offset_cli::config::{Config, MAX_YEARS};
use offset_cli::csv_loader;
use offset_cli::logging::{self, LogOptions};
use offset_cli::session::Session;
use offset_cli::state::{AppState, policy_for};
use offset_cli::utils::{parse_bill_spec, parse_decimal, parse_non_negative, parse_percent};
use offset_cli::views::OutputFormat;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Works out how much invested capital pays your recurring bills.
#[derive(Debug, Parser)]
#[command(name = "bill-offset", version, about, long_about = None)]
struct Cli {
    /// TOML file with default rates.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `offset_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the console.
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Investment needed to pay one monthly bill forever.
    Perpetuity(PerpetuityArgs),

    /// Grow an investment and check which bills it covers.
    Project(ProjectArgs),

    /// Interactive session that recomputes after every change.
    Session,
}

#[derive(Debug, Args)]
struct PerpetuityArgs {
    /// Monthly bill amount in dollars.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_decimal)]
    monthly_bill: Decimal,

    /// Expected annual return rate, in percent.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_decimal)]
    return_rate: Option<Decimal>,

    /// Annual inflation rate, in percent.
    #[arg(long, value_parser = parse_percent)]
    inflation: Option<Decimal>,

    /// Tax rate on investment returns, in percent.
    #[arg(long, value_parser = parse_percent)]
    tax: Option<Decimal>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Amount invested today, in dollars.
    #[arg(long, value_parser = parse_non_negative)]
    amount: Decimal,

    /// Expected annual return, in percent.
    #[arg(long, value_parser = parse_non_negative)]
    roi: Option<Decimal>,

    /// Tax rate on investment gains, in percent.
    #[arg(long, value_parser = parse_percent)]
    tax: Option<Decimal>,

    /// Projection horizon in years.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_YEARS)))]
    years: Option<u32>,

    /// A bill as NAME:MONTHLY[:INFLATION]. Repeat for several bills.
    #[arg(long = "bill", value_parser = parse_bill_spec)]
    bills: Vec<Bill>,

    /// CSV file of bills (name,monthly_cost,inflation_rate).
    #[arg(long)]
    bills_csv: Option<PathBuf>,

    /// Grow each bill by its own inflation rate over the horizon before comparing.
    #[arg(long, default_value_t = false)]
    apply_bill_inflation: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_perpetuity(
    args: PerpetuityArgs,
    config: &Config,
) -> anyhow::Result<String> {
    let input = PerpetuityInput {
        monthly_bill: args.monthly_bill,
        annual_return_percent: args.return_rate.or(config.return_rate).unwrap_or_default(),
        inflation_rate_percent: args.inflation.unwrap_or(config.inflation_rate),
        tax_rate_percent: args.tax.unwrap_or(config.tax_rate),
    };
    debug!(?input, "perpetuity input");
    app::perpetuity_report(&input, args.format)
}

fn run_project(
    args: ProjectArgs,
    config: &Config,
) -> anyhow::Result<String> {
    let investment = InvestmentInput::new(
        args.amount,
        args.roi.or(config.roi).unwrap_or_default(),
        args.tax.unwrap_or(config.projection_tax_rate),
    );
    investment.validate()?;

    let mut bills = args.bills;
    if let Some(path) = &args.bills_csv {
        let loaded = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load bills from {}", path.display()))?;
        info!(count = loaded.len(), path = %path.display(), "bills loaded");
        bills.extend(loaded);
    }
    for bill in &bills {
        bill.validate()
            .with_context(|| format!("invalid bill '{}'", bill.name))?;
    }

    let policy = policy_for(args.apply_bill_inflation || config.apply_bill_inflation);
    app::projection_report(
        &investment,
        args.years.unwrap_or(config.years),
        bills,
        policy,
        args.format,
        io::stdout().is_terminal(),
    )
}

fn run_session(config: &Config) -> anyhow::Result<()> {
    let mut session = Session::new(AppState::new(config), io::stdout().is_terminal());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session
        .run(stdin.lock(), &mut stdout)
        .context("session I/O failed")
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())?;

    logging::init_logging(&LogOptions {
        level: cli.log_level.clone().or_else(|| config.log_level.clone()),
        file: cli.log_file.clone(),
        quiet: cli.quiet,
    })?;
    debug!(?config, "configuration resolved");

    let report = match cli.command {
        Command::Perpetuity(args) => run_perpetuity(args, &config)?,
        Command::Project(args) => run_project(args, &config)?,
        Command::Session => return run_session(&config),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

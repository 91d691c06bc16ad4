//! Interactive calculator session.
//!
//! Reads one command per line, applies it to the [`AppState`], and re-renders
//! both calculators after every command that changes an input. Errors are
//! reported inline and the session keeps going.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use offset_core::calculations::CoveragePolicy;
use offset_core::calculations::common::nearest_f64;
use offset_core::{Bill, BillField, BillId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::MAX_YEARS;
use crate::csv_loader;
use crate::format::{format_currency, format_rate_input};
use crate::logging;
use crate::state::AppState;
use crate::utils::{
    ParseInputError, parse_bill_spec, parse_decimal, parse_non_negative, parse_percent,
};
use crate::views::{perpetuity, projection};

pub const HELP: &str = "\
Commands:
  show                                  Print all inputs and results
  set <field> <value>                   Change an input; fields:
        monthly-bill, return-rate, inflation, tax   (perpetuity)
        amount, roi, projection-tax, years          (projection)
  add [NAME[:MONTHLY[:INFLATION]]]      Append a bill (empty bill when no argument)
  edit <id> <name|cost|inflation> <v>   Change one field of a bill
  remove <id>                           Remove a bill
  load <file.csv>                       Append bills from a CSV file
  policy <nominal|inflation>            Compare against today's or inflated bill costs
  log <level>                           Change the log filter (e.g. debug)
  help                                  Show this text
  quit                                  Leave the session
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("'{0}' is not a bill id")]
    InvalidId(String),

    #[error("years must be a whole number between 1 and {max}, got '{value}'")]
    InvalidYears { value: String, max: u32 },

    #[error("unknown policy '{0}' (expected 'nominal' or 'inflation')")]
    UnknownPolicy(String),

    #[error(transparent)]
    Input(#[from] ParseInputError),
}

/// An input of one of the two calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    MonthlyBill,
    ReturnRate,
    Inflation,
    Tax,
    Amount,
    Roi,
    ProjectionTax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Set(InputField, Decimal),
    SetYears(u32),
    AddDefault,
    Add(Bill),
    Edit(BillId, BillField),
    Remove(BillId),
    Load(PathBuf),
    Policy(CoveragePolicy),
    Log(String),
    Quit,
}

impl Command {
    /// Parses one line of input. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "help" | "?" => Command::Help,
            "show" => Command::Show,
            "quit" | "exit" => Command::Quit,
            "set" => parse_set(rest)?,
            "add" if rest.is_empty() => Command::AddDefault,
            "add" => Command::Add(parse_new_bill(rest)?),
            "edit" => parse_edit(rest)?,
            "remove" | "rm" => Command::Remove(parse_id(required(rest, "remove <id>")?)?),
            "load" => Command::Load(PathBuf::from(required(rest, "load <file.csv>")?)),
            "policy" => {
                Command::Policy(parse_policy(required(rest, "policy <nominal|inflation>")?)?)
            }
            "log" => Command::Log(required(rest, "log <level>")?.to_string()),
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Whether running the command can change a calculator input.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Set(..)
                | Command::SetYears(_)
                | Command::AddDefault
                | Command::Add(_)
                | Command::Edit(..)
                | Command::Remove(_)
                | Command::Load(_)
                | Command::Policy(_)
        )
    }
}

fn required<'a>(
    rest: &'a str,
    usage: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn parse_id(s: &str) -> Result<BillId, CommandError> {
    s.trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(BillId::from)
        .map_err(|_| CommandError::InvalidId(s.to_string()))
}

fn parse_set(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "set <field> <value>";
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(USAGE))?;
    let value = value.trim();

    let field = match field.to_ascii_lowercase().as_str() {
        "years" => {
            let years = value
                .parse::<u32>()
                .ok()
                .filter(|years| (1..=MAX_YEARS).contains(years))
                .ok_or_else(|| CommandError::InvalidYears {
                    value: value.to_string(),
                    max: MAX_YEARS,
                })?;
            return Ok(Command::SetYears(years));
        }
        "monthly-bill" | "bill" => InputField::MonthlyBill,
        "return-rate" | "return" => InputField::ReturnRate,
        "inflation" => InputField::Inflation,
        "tax" => InputField::Tax,
        "amount" | "investment" => InputField::Amount,
        "roi" => InputField::Roi,
        "projection-tax" => InputField::ProjectionTax,
        other => return Err(CommandError::UnknownField(other.to_string())),
    };

    let value = match field {
        InputField::Inflation | InputField::Tax | InputField::ProjectionTax => {
            parse_percent(value)?
        }
        // A non-positive bill or return is shown as a prompt, not refused
        InputField::MonthlyBill | InputField::ReturnRate => parse_decimal(value)?,
        InputField::Amount | InputField::Roi => parse_non_negative(value)?,
    };
    Ok(Command::Set(field, value))
}

fn parse_new_bill(rest: &str) -> Result<Bill, CommandError> {
    if rest.contains(':') {
        Ok(parse_bill_spec(rest)?)
    } else {
        Ok(Bill::new(rest, Decimal::ZERO, Decimal::ZERO))
    }
}

fn parse_edit(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "edit <id> <name|cost|inflation> <value>";
    let (id, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(USAGE))?;
    let id = parse_id(id)?;
    let rest = rest.trim_start();
    let (field, value) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(field, value)| (field, value.trim()));

    let field = match field.to_ascii_lowercase().as_str() {
        "name" => BillField::Name(value.to_string()),
        "cost" | "monthly-cost" => {
            BillField::MonthlyCost(parse_non_negative(required(value, USAGE)?)?)
        }
        "inflation" => BillField::InflationRate(parse_percent(required(value, USAGE)?)?),
        other => return Err(CommandError::UnknownField(other.to_string())),
    };
    Ok(Command::Edit(id, field))
}

fn parse_policy(s: &str) -> Result<CoveragePolicy, CommandError> {
    match s.to_ascii_lowercase().as_str() {
        "nominal" => Ok(CoveragePolicy::Nominal),
        "inflation" | "inflation-adjusted" => Ok(CoveragePolicy::InflationAdjusted),
        _ => Err(CommandError::UnknownPolicy(s.to_string())),
    }
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    state: AppState,
    ansi: bool,
}

impl Session {
    pub fn new(
        state: AppState,
        ansi: bool,
    ) -> Self {
        Self { state, ansi }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reads commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> io::Result<()> {
        output.write_all(HELP.as_bytes())?;
        writeln!(output)?;
        output.write_all(self.render().as_bytes())?;

        let mut lines = input.lines();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(line) = lines.next().transpose()? else {
                writeln!(output)?;
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(output, "error: {err}")?;
                    continue;
                }
            };

            match self.execute(command, output) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => writeln!(output, "error: {err:#}")?,
            }
        }

        info!("session ended");
        Ok(())
    }

    /// Applies one command, re-rendering when it changed an input.
    pub fn execute<W: Write>(
        &mut self,
        command: Command,
        output: &mut W,
    ) -> anyhow::Result<Flow> {
        debug!(?command, "executing");
        let rerender = command.mutates() || command == Command::Show;

        match command {
            Command::Help => output.write_all(HELP.as_bytes())?,
            Command::Show => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Set(field, value) => self.set(field, value),
            Command::SetYears(years) => self.state.years = years,
            Command::AddDefault => {
                let id = self.state.bills.add_default();
                writeln!(output, "added bill {id}")?;
            }
            Command::Add(bill) => {
                let id = self.state.bills.add(bill)?;
                writeln!(output, "added bill {id}")?;
            }
            Command::Edit(id, field) => self.state.bills.edit(id, field)?,
            Command::Remove(id) => {
                self.state.bills.remove(id)?;
                writeln!(output, "removed bill {id}")?;
            }
            Command::Load(path) => {
                let bills = csv_loader::load_from_file(&path)
                    .with_context(|| format!("failed to load bills from {}", path.display()))?;
                let count = bills.len();
                for bill in bills {
                    self.state.bills.add(bill)?;
                }
                writeln!(output, "loaded {count} bills")?;
            }
            Command::Policy(policy) => self.state.policy = policy,
            Command::Log(level) => {
                logging::set_log_level(&level)?;
                writeln!(output, "log level set to {level}")?;
            }
        }

        if rerender {
            output.write_all(self.render().as_bytes())?;
        }
        Ok(Flow::Continue)
    }

    fn set(
        &mut self,
        field: InputField,
        value: Decimal,
    ) {
        let state = &mut self.state;
        match field {
            InputField::MonthlyBill => state.perpetuity.monthly_bill = value,
            InputField::ReturnRate => state.perpetuity.annual_return_percent = value,
            InputField::Inflation => state.perpetuity.inflation_rate_percent = value,
            InputField::Tax => state.perpetuity.tax_rate_percent = value,
            InputField::Amount => state.investment.amount = value,
            InputField::Roi => state.investment.annual_return_percent = value,
            InputField::ProjectionTax => state.investment.tax_rate_percent = value,
        }
    }

    /// Renders every input and both calculators' results.
    pub fn render(&self) -> String {
        let state = &self.state;
        let mut out = String::new();

        out.push_str("== Bill Offset Calculator ==\n");
        out.push_str(&format!(
            "Monthly bill: {} | Return: {} | Inflation: {} | Tax: {}\n",
            format_currency(nearest_f64(state.perpetuity.monthly_bill)),
            format_rate_input(nearest_f64(state.perpetuity.annual_return_percent)),
            format_rate_input(nearest_f64(state.perpetuity.inflation_rate_percent)),
            format_rate_input(nearest_f64(state.perpetuity.tax_rate_percent)),
        ));
        out.push_str(&perpetuity::render(
            &state.perpetuity,
            &state.perpetuity_figures(),
        ));

        out.push_str("\n== Investment Projection ==\n");
        out.push_str(&format!(
            "Investment: {} | ROI: {} | Tax: {} | Years: {}\n",
            format_currency(nearest_f64(state.investment.amount)),
            format_rate_input(nearest_f64(state.investment.annual_return_percent)),
            format_rate_input(nearest_f64(state.investment.tax_rate_percent)),
            state.years,
        ));
        out.push_str(&projection::render(
            &state.projection_result(),
            self.ansi,
        ));
        out
    }
}

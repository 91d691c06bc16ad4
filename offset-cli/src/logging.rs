//! `tracing` setup for the `bill-offset` binary.
//!
//! Log records go to stderr so reports on stdout can be piped, and
//! optionally to a file. The filter can be swapped while a session runs.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Used when neither a level nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn,offset_core=info,offset_cli=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot open log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logging is not initialized")]
    NotInitialized,

    #[error("cannot apply log filter: {0}")]
    Reload(#[from] reload::Error),
}

/// How the binary wants its logs.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Filter directives, e.g. `debug` or `offset_core=trace`.
    pub level: Option<String>,
    /// Also append records to this file.
    pub file: Option<PathBuf>,
    /// No console output.
    pub quiet: bool,
}

static LEVEL_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Picks the filter directives: an explicit level wins over `RUST_LOG`,
/// which wins over [`DEFAULT_FILTER`]. A blank `RUST_LOG` counts as unset.
pub fn filter_directives<'a>(
    level: Option<&'a str>,
    rust_log: Option<&'a str>,
) -> &'a str {
    level
        .or(rust_log.filter(|env| !env.trim().is_empty()))
        .unwrap_or(DEFAULT_FILTER)
}

/// Parses filter directives, rejecting anything `EnvFilter` cannot read.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|source| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        source,
    })
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// An unparseable level or an unopenable log file is reported instead of
/// being replaced by defaults. A malformed `RUST_LOG` is reported the same way.
pub fn init_logging(options: &LogOptions) -> Result<(), LoggingError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = parse_filter(filter_directives(
        options.level.as_deref(),
        rust_log.as_deref(),
    ))?;
    let file = options.file.as_deref().map(open_log_file).transpose()?;

    let (filter, handle) = reload::Layer::new(filter);

    let console = (!options.quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });
    let file = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    // A subscriber installed earlier (tests) keeps its own filter.
    if tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .is_ok()
    {
        let _ = LEVEL_HANDLE.set(handle);
    }
    Ok(())
}

/// Replaces the active filter, e.g. from the session's `log` command.
pub fn set_log_level(level: &str) -> Result<(), LoggingError> {
    let filter = parse_filter(level)?;
    let handle = LEVEL_HANDLE.get().ok_or(LoggingError::NotInitialized)?;
    handle.reload(filter)?;
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// `<local time> <LEVEL> <target>: <fields>`, with the level coloured on a
/// terminal.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            let colour = match *meta.level() {
                Level::ERROR => "31",
                Level::WARN => "33",
                Level::INFO => "32",
                Level::DEBUG => "34",
                Level::TRACE => "35",
            };
            write!(
                writer,
                "\x1b[2m{time}\x1b[0m \x1b[{colour}m{:>5}\x1b[0m ",
                meta.level()
            )?;
        } else {
            write!(writer, "{time} {:>5} ", meta.level())?;
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Arguments are parsed by hand. Every option can also be set through a
//! `DROPFORM_DEMO_*` environment variable; explicit flags win.

use std::env;
use std::fmt;
use std::process;

use crate::app::Page;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
dropform demo: sign-in and sign-up forms with file drop

USAGE:
    dropform-demo [OPTIONS]

OPTIONS:
    --page=PAGE          Start page: 'signin' (default) or 'signup'
    --latency-ms=N       Simulated request latency (default: 1200)
    --strict-drop        Refuse dropped files outside the accept list
    --exit-after-ms=N    Quit automatically after N milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Tab / Shift-Tab   Move between fields and controls
    Enter             Submit (or switch page on the toggle link)
    Backspace         Edit text, or clear the picture
    Esc / Ctrl+C      Quit

DROPPING FILES:
    Focus the picture field and drag a file onto the terminal window.

ENVIRONMENT VARIABLES:
    DROPFORM_DEMO_PAGE           Override --page
    DROPFORM_DEMO_LATENCY_MS     Override --latency-ms
    DROPFORM_DEMO_STRICT_DROP    Set to 1 for --strict-drop
    DROPFORM_DEMO_EXIT_AFTER_MS  Override --exit-after-ms
    DROPFORM_DEMO_LOG            Write logs to this file (RUST_LOG filters)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub page: Page,
    /// Simulated request latency in milliseconds.
    pub latency_ms: u64,
    pub strict_drop: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            page: Page::SignIn,
            latency_ms: 1200,
            strict_drop: false,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("dropform-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parse `args` (without the program name), reading overrides through `var`.
///
/// Malformed environment values are ignored; malformed flags are errors.
pub fn parse_from(
    args: &[String],
    var: impl Fn(&str) -> Option<String>,
) -> Result<Command, CliError> {
    let mut opts = Opts::default();

    if let Some(val) = var("DROPFORM_DEMO_PAGE")
        && let Some(page) = Page::parse(&val)
    {
        opts.page = page;
    }
    if let Some(val) = var("DROPFORM_DEMO_LATENCY_MS")
        && let Ok(n) = val.parse()
    {
        opts.latency_ms = n;
    }
    if let Some(val) = var("DROPFORM_DEMO_STRICT_DROP") {
        opts.strict_drop = matches!(val.as_str(), "1" | "true" | "yes");
    }
    if let Some(val) = var("DROPFORM_DEMO_EXIT_AFTER_MS")
        && let Ok(n) = val.parse()
    {
        opts.exit_after_ms = n;
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--strict-drop" => opts.strict_drop = true,
            other => {
                if let Some(val) = other.strip_prefix("--page=") {
                    opts.page = Page::parse(val).ok_or_else(|| CliError::InvalidValue {
                        flag: "--page",
                        value: val.to_string(),
                    })?;
                } else if let Some(val) = other.strip_prefix("--latency-ms=") {
                    opts.latency_ms = parse_number("--latency-ms", val)?;
                } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                    opts.exit_after_ms = parse_number("--exit-after-ms", val)?;
                } else {
                    return Err(CliError::UnknownArgument(other.to_string()));
                }
            }
        }
    }

    Ok(Command::Run(opts))
}

fn parse_number(flag: &'static str, val: &str) -> Result<u64, CliError> {
    val.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: val.to_string(),
    })
}

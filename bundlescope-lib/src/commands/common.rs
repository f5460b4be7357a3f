//! Argument types and input loading shared between commands.

use super::Host;
use crate::Result;
use crate::extensions::{CustomReport, CustomReportsGenerator, ExtensionRecord};
use crate::model::StatsDocument;
use crate::normalize::load_files;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use std::fs;
use std::io::{IsTerminal, Write};

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Output and diagnostics arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Stats files to load
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Stats file to analyze; may be repeated
    #[arg(long, short = 'i', value_name = "FILE", required = true, num_args = 1..)]
    pub input: Vec<Utf8PathBuf>,

    /// Stats file to compare against
    #[arg(long, short = 'r', value_name = "FILE")]
    pub reference: Option<Utf8PathBuf>,

    /// JSON file with custom reports to attach to every input; may be repeated
    #[arg(long, value_name = "FILE")]
    pub custom_report: Vec<Utf8PathBuf>,
}

/// Normalized inputs of a command.
#[derive(Debug)]
pub struct Inputs {
    pub input: Vec<StatsDocument>,
    pub reference: Option<StatsDocument>,
}

impl Inputs {
    /// Input documents followed by the reference, if any.
    pub fn all(&self) -> Vec<StatsDocument> {
        self.input.iter().chain(&self.reference).cloned().collect()
    }
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportFile {
    One(CustomReport),
    Many(Vec<CustomReport>),
}

/// Collect the custom report files into one extension record.
fn custom_reports(paths: &[Utf8PathBuf]) -> Result<Option<ExtensionRecord>> {
    if paths.is_empty() {
        return Ok(None);
    }

    let mut generator = CustomReportsGenerator::new();
    for path in paths {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading custom report file '{path}'"))?;
        let reports = match serde_json::from_str(&text).into_app_err_with(|| format!("parsing custom report file '{path}'"))? {
            ReportFile::One(report) => vec![report],
            ReportFile::Many(reports) => reports,
        };

        for report in reports {
            generator.handle_report(report);
        }
    }

    Ok(Some(generator.get()))
}

/// Load and normalize every input concurrently.
///
/// Each failure is written to the host's error stream; the load fails once all files
/// have been attempted.
pub async fn load_inputs<H: Host>(host: &mut H, args: &InputArgs) -> Result<Inputs> {
    let extra: Vec<ExtensionRecord> = custom_reports(&args.custom_report)?.into_iter().collect();

    let mut paths = args.input.clone();
    paths.extend(args.reference.iter().cloned());

    let mut failures = 0;
    let mut documents = Vec::with_capacity(paths.len());
    for result in load_files(&paths, &extra).await {
        match result {
            Ok(document) => documents.push(document),
            Err(e) => {
                failures += 1;
                let _ = writeln!(host.error(), "{e:#}");
            }
        }
    }

    if failures > 0 {
        bail!("could not load {failures} of {} stats file(s)", paths.len());
    }

    let reference = if args.reference.is_some() { documents.pop() } else { None };
    Ok(Inputs { input: documents, reference })
}

//! Command-line interface and orchestration for bundlescope
//!
//! This module implements the CLI commands on top of the library: it parses
//! arguments, loads configuration and stats files, and prints results.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **query**: Normalize the inputs and print the JSON result of a query expression
//! - **diff**: Normalize an input and a reference and print the structural changes
//! - **validate**: Run the configured built-in rules and query rules, print every
//!   finding grouped by file, and exit with status 1 when the run failed
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. Input files are normalized concurrently
//! (see [`load_files`](crate::normalize::load_files)); every failure is reported
//! before the command gives up.
//!
//! All output goes through a [`Host`], so commands can be tested without touching
//! the real process streams.
//!
//! Configuration is managed through a TOML file (`bundlescope.toml`) listing the
//! built-in rules with their levels and parameters, plus query rules.

mod common;
mod config;
mod diff;
mod host;
mod init;
mod query;
mod run;
mod validate;

pub use common::{ColorMode, InputArgs, LogLevel, OutputArgs};
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML, RuleSetting};
pub use diff::{DiffArgs, run_diff};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use query::{QueryArgs, run_query};
pub use run::run;
pub use validate::{ValidateArgs, validate_stats};

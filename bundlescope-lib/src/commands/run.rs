//! Command dispatch logic for bundlescope

use super::{DiffArgs, InitArgs, QueryArgs, ValidateArgs, init_config, run_diff, run_query, validate_stats};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "bundlescope", author, version, long_about = None)]
#[command(about = "Analyze, compare, and validate bundler build statistics")]
#[command(styles = CLAP_STYLES)]
struct Args {
    #[command(subcommand)]
    command: BundlescopeSubcommand,
}

#[derive(Subcommand, Debug)]
enum BundlescopeSubcommand {
    /// Evaluate a query over normalized stats and print the result as JSON
    Query(Box<QueryArgs>),
    /// Show what changed between a reference build and a new build
    Diff(Box<DiffArgs>),
    /// Run validation rules over stats files
    Validate(Box<ValidateArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = Args::parse_from(args);

    match &args.command {
        BundlescopeSubcommand::Query(query_args) => run_query(host, query_args).await,
        BundlescopeSubcommand::Diff(diff_args) => run_diff(host, diff_args).await,
        BundlescopeSubcommand::Validate(validate_args) => validate_stats(host, validate_args).await,
        BundlescopeSubcommand::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let args = Args::parse_from(["bundlescope", "validate", "-i", "a.json", "-i", "b.json", "--reference", "r.json", "--warn-as-error"]);
        let BundlescopeSubcommand::Validate(validate) = args.command else {
            panic!("expected validate");
        };
        assert_eq!(validate.inputs.input.len(), 2);
        assert_eq!(validate.inputs.reference.as_deref().map(camino::Utf8Path::as_str), Some("r.json"));
        assert!(validate.warn_as_error);
    }
}

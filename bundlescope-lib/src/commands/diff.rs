use super::Host;
use super::common::{OutputArgs, init_logging, load_inputs, InputArgs};
use crate::Result;
use crate::diff::{DocumentDiff, PackageChange, compare, format_diff};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::app_err;
use owo_colors::OwoColorize;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Stats file of the new build
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Utf8PathBuf,

    /// Stats file of the baseline build
    #[arg(long, short = 'r', value_name = "FILE")]
    pub reference: Utf8PathBuf,

    /// Compare sizes under this compressor instead of raw sizes
    #[arg(long, value_name = "NAME")]
    pub compressor: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Compare two stats files and print the differences
///
/// # Errors
///
/// Returns an error if either file cannot be loaded
pub async fn run_diff<H: Host>(host: &mut H, args: &DiffArgs) -> Result<()> {
    init_logging(args.output.log_level);

    let input_args = InputArgs {
        input: vec![args.input.clone()],
        reference: Some(args.reference.clone()),
        custom_report: Vec::new(),
    };
    let inputs = load_inputs(host, &input_args).await?;
    let (Some(after), Some(before)) = (inputs.input.first(), inputs.reference.as_ref()) else {
        return Err(app_err!("diff needs an input and a reference"));
    };

    let diff = compare(before, after, args.compressor.as_deref());
    let _ = write!(host.output(), "{}", render(&diff, args.output.color.enabled()));
    Ok(())
}

/// Render a diff as text, one change per line.
pub fn render(diff: &DocumentDiff, colors: bool) -> String {
    let mut out = String::new();
    let mut line = |sign: &str, text: String| {
        let sign = match (colors, sign) {
            (false, _) => sign.to_string(),
            (true, "+") => sign.green().to_string(),
            (true, "-") => sign.red().to_string(),
            (true, _) => sign.yellow().to_string(),
        };
        out.push_str(&format!("{sign} {text}\n"));
    };

    for (kind, entities) in [("module", &diff.modules), ("chunk", &diff.chunks), ("asset", &diff.assets)] {
        for id in &entities.added {
            line("+", format!("{kind} {id}"));
        }
        for id in &entities.removed {
            line("-", format!("{kind} {id}"));
        }
    }

    for package in &diff.packages {
        match package {
            PackageChange::Added { name, version } => line("+", format!("package {name}{}", at(version.as_deref()))),
            PackageChange::Removed { name, version } => line("-", format!("package {name}{}", at(version.as_deref()))),
            PackageChange::Changed { .. } => {}
        }
    }

    for entry in diff.entries() {
        let change = format_diff(&entry.item);
        if !change.is_empty() {
            line("~", format!("{}: {change}", entry.title));
        }
    }

    if out.is_empty() {
        return "No differences\n".to_string();
    }

    out
}

fn at(version: Option<&str>) -> String {
    version.map(|version| format!("@{version}")).unwrap_or_default()
}

use super::Host;
use super::common::{InputArgs, OutputArgs, init_logging, load_inputs};
use super::config::Config;
use crate::Result;
use crate::helpers::plural_with_value;
use crate::query::{MethodSet, Query, QueryEngine};
use crate::validation::{FindingStorage, FindingType, RuleData, RunOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, app_err};
use owo_colors::OwoColorize;
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Path to configuration file (default is `bundlescope.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Fail when any warning is reported
    #[arg(long)]
    pub warn_as_error: bool,

    /// File holding a query rule expression; may be repeated
    #[arg(long, value_name = "PATH")]
    pub query_rule: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Read a query rule file; the rule is named after the file.
fn load_query_rule(path: &Utf8Path) -> Result<Query> {
    let source = fs::read_to_string(path).into_app_err_with(|| format!("reading query rule file '{path}'"))?;
    let name = path.file_stem().unwrap_or(path.as_str());
    Query::new(name, None, source)
}

/// Run the configured rules over the inputs and print every finding
///
/// # Errors
///
/// Returns an error if the configuration or inputs cannot be loaded, or if validation fails
pub async fn validate_stats<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    init_logging(args.output.log_level);

    let mut config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    config.warn_as_error |= args.warn_as_error;

    let extra = args.query_rule.iter().map(|path| load_query_rule(path)).collect::<Result<Vec<_>>>()?;
    let runner = config.runner(extra)?;

    let inputs = load_inputs(host, &args.inputs).await?;
    let engine = QueryEngine::new(&inputs.input, MethodSet::new())?;
    let data = RuleData {
        input: &inputs.input,
        reference: inputs.reference.as_ref(),
        engine: &engine,
        compressor: config.compressor.as_deref(),
        network: config.network.as_deref(),
    };

    let outcome = runner.run(&data);
    let colors = args.output.color.enabled();
    let _ = write!(host.output(), "{}", render(&outcome.findings, colors));

    for (name, error) in outcome.failed_rules() {
        let _ = writeln!(host.error(), "Rule '{name}' failed: {error}");
    }

    report_outcome(host, &outcome)
}

fn report_outcome<H: Host>(host: &mut H, outcome: &RunOutcome) -> Result<()> {
    if outcome.failed {
        let _ = writeln!(host.error(), "Validation failed");
        host.exit(1);
        return Err(app_err!("validation failed"));
    }

    Ok(())
}

fn words(singular: &str, plural: &str) -> [String; 2] {
    [singular.to_string(), plural.to_string()]
}

#[expect(clippy::cast_precision_loss, reason = "finding counts are small")]
fn count_text(storage: &FindingStorage, kind: FindingType, singular: &str, plural: &str) -> String {
    plural_with_value(storage.count(kind) as f64, &words(singular, plural))
}

/// Render findings grouped by filename, followed by totals.
pub fn render(storage: &FindingStorage, colors: bool) -> String {
    let mut out = String::new();

    for (filename, findings) in storage.files() {
        out.push_str(&format!("{}\n", if colors { filename.bold().to_string() } else { filename.to_string() }));

        for finding in findings {
            let label = format!("{:<5}", finding.kind.to_string());
            let label = match (colors, finding.kind) {
                (false, _) => label,
                (true, FindingType::Error) => label.red().to_string(),
                (true, FindingType::Warn) => label.yellow().to_string(),
                (true, FindingType::Info) => label.blue().to_string(),
            };
            out.push_str(&format!("  {label}  {} [{}]\n", finding.message, finding.rule));
        }

        out.push('\n');
    }

    out.push_str(&format!(
        "{}, {}, {}\n",
        count_text(storage, FindingType::Error, "error", "errors"),
        count_text(storage, FindingType::Warn, "warning", "warnings"),
        count_text(storage, FindingType::Info, "info", "infos"),
    ));

    out
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::validation::Api;

    #[test]
    fn test_render() {
        let mut storage = FindingStorage::new();
        {
            let mut api = storage.api("restricted-modules");
            api.error("Module ./a.js should not be used", Some("stats.json"));
            api.info("Just so you know", None);
        }
        {
            let mut api = storage.api("entry-download-size-limits");
            api.warn("Entry \"main\" is large", Some("stats.json"));
        }

        insta::assert_snapshot!(render(&storage, false), @r#"
        stats.json
          error  Module ./a.js should not be used [restricted-modules]
          warn   Entry "main" is large [entry-download-size-limits]

        unknown
          info   Just so you know [restricted-modules]

        1 error, 1 warning, 1 info
        "#);
    }

    #[test]
    fn test_failed_outcome_exits_with_one() {
        let mut host = TestHost::new();
        let passed = RunOutcome {
            findings: FindingStorage::new(),
            rules: Vec::new(),
            failed: false,
        };
        report_outcome(&mut host, &passed).unwrap();
        assert_eq!(host.exit_code, None);

        let failed = RunOutcome { failed: true, ..passed };
        let _ = report_outcome(&mut host, &failed).unwrap_err();
        assert_eq!(host.exit_code, Some(1));
        assert_eq!(String::from_utf8(host.error_buf).unwrap(), "Validation failed\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&FindingStorage::new(), false), "0 errors, 0 warnings, 0 infos\n");
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_query_rule_file_is_named_after_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("no-big-modules.cel")).unwrap();
        fs::write(&path, "[]").unwrap();
        assert_eq!(load_query_rule(&path).unwrap().name(), "no-big-modules");
    }
}

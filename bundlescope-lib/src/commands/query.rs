use super::Host;
use super::common::{InputArgs, OutputArgs, init_logging, load_inputs};
use crate::Result;
use crate::query::{MethodSet, QueryEngine};
use clap::Parser;
use ohno::IntoAppError;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Print the result on a single line
    #[arg(long)]
    pub compact: bool,

    /// Query expression; `files` holds the inputs followed by the reference
    #[arg(value_name = "EXPRESSION")]
    pub expression: String,
}

/// Evaluate a query over the inputs and print the JSON result
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the query fails
pub async fn run_query<H: Host>(host: &mut H, args: &QueryArgs) -> Result<()> {
    init_logging(args.output.log_level);

    let inputs = load_inputs(host, &args.inputs).await?;
    let engine = QueryEngine::new(&inputs.all(), MethodSet::new())?;
    let result = engine.query(&args.expression, None)?;

    let text = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .into_app_err("formatting query result")?;

    let _ = writeln!(host.output(), "{text}");
    Ok(())
}

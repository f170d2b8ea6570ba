/*!
`evaluate.rs`

Implements `fabric-cli evaluate <instance> <code>` (alias `eval`).

Sends a Python expression to the instance's `Evaluate` method, which answers
with `(result, exception)`.

Text output:
  result: <result>
  exception: <exception>      (only when non-empty)

JSON Output Shape:
{
	"code": "1 + 1",
	"exception": "",
	"result": "2"
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cmd::format::{Role, StyleOptions, color, to_json};
use crate::cmd::shared::{BusOptions, block_on_bus, read_code_arg, require_arg};

/// CLI arguments for `fabric-cli evaluate <instance> <code>`
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Name of the instance to run this command on
    #[arg(value_name = "INSTANCE")]
    pub instance: Option<String>,

    /// Python expression to evaluate (`-` reads stdin)
    #[arg(value_name = "CODE", allow_hyphen_values = true)]
    pub code: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EvaluateOutcome {
    pub code: String,
    pub exception: String,
    pub result: String,
}

pub fn execute_evaluate(args: &EvaluateArgs, bus: &BusOptions) -> Result<()> {
    let instance = require_arg(args.instance.as_deref(), "instance")?;
    let code = read_code_arg(args.code.as_deref(), "code")?;

    let (result, exception) = block_on_bus(bus, |client| {
        let code = code.as_str();
        async move {
            let bus_name = client.checked_instance(instance).await?;
            client.evaluate(&bus_name, code).await
        }
    })?;

    let outcome = EvaluateOutcome {
        code,
        exception,
        result,
    };
    println!(
        "{}",
        render_evaluate(&outcome, args.json, &StyleOptions::detect())
    );
    Ok(())
}

pub fn render_evaluate(outcome: &EvaluateOutcome, json: bool, style: &StyleOptions) -> String {
    if json {
        return to_json(outcome);
    }
    let mut out = format!("result: {}", outcome.result);
    if !outcome.exception.is_empty() {
        out.push('\n');
        out.push_str(&color(Role::Error, "exception:", style));
        out.push(' ');
        out.push_str(&outcome.exception);
    }
    out
}

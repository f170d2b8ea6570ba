/*!
`execute.rs`

Implements `fabric-cli execute <instance> <source>` (alias `exec`).

Sends Python source to the instance's `Execute` method. The remote side
returns the formatted exception, or an empty string on success.

  - `<source>` of `-` reads the source from stdin
  - text mode prints nothing on success, `exception: ...` otherwise

JSON Output Shape:
{
	"exception": "",
	"source": "print('hi')"
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cmd::format::{Role, StyleOptions, color, to_json};
use crate::cmd::shared::{BusOptions, block_on_bus, read_code_arg, require_arg};

/// CLI arguments for `fabric-cli execute <instance> <source>`
#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Name of the instance to run this command on
    #[arg(value_name = "INSTANCE")]
    pub instance: Option<String>,

    /// Python source code to execute (`-` reads stdin)
    #[arg(value_name = "SOURCE", allow_hyphen_values = true)]
    pub source: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(short, long)]
    pub json: bool,
}

/// Result of one `Execute` call.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ExecuteOutcome {
    pub exception: String,
    pub source: String,
}

pub fn execute_execute(args: &ExecuteArgs, bus: &BusOptions) -> Result<()> {
    let instance = require_arg(args.instance.as_deref(), "instance")?;
    let source = read_code_arg(args.source.as_deref(), "source")?;

    let exception = block_on_bus(bus, |client| {
        let source = source.as_str();
        async move {
            let bus_name = client.checked_instance(instance).await?;
            client.execute(&bus_name, source).await
        }
    })?;

    let outcome = ExecuteOutcome { exception, source };
    if let Some(out) = render_execute(&outcome, args.json, &StyleOptions::detect()) {
        println!("{out}");
    }
    Ok(())
}

/// `None` when there is nothing to print.
pub fn render_execute(
    outcome: &ExecuteOutcome,
    json: bool,
    style: &StyleOptions,
) -> Option<String> {
    if json {
        return Some(to_json(outcome));
    }
    if outcome.exception.is_empty() {
        return None;
    }
    Some(format!(
        "{} {}",
        color(Role::Error, "exception:", style),
        outcome.exception
    ))
}

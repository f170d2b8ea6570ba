/*!
`list_windows.rs`

Implements `fabric-cli list-windows <instance>` (alias `lw`).

Reads the `Windows` property (`a{sb}`) of one instance. Windows are
printed sorted by name.

JSON Output Shape:
{
	"instance": "bar",
	"windows": {
		"bar-window": true
	}
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cmd::format::to_json;
use crate::cmd::shared::{BusOptions, block_on_bus, require_arg};

/// CLI arguments for `fabric-cli list-windows <instance>`
#[derive(Args, Debug)]
pub struct ListWindowsArgs {
    /// Name of the instance to run this command on
    #[arg(value_name = "INSTANCE")]
    pub instance: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Serialize)]
struct WindowsBody<'a> {
    instance: &'a str,
    windows: &'a BTreeMap<String, bool>,
}

pub fn execute_list_windows(args: &ListWindowsArgs, bus: &BusOptions) -> Result<()> {
    let instance = require_arg(args.instance.as_deref(), "instance")?;

    let windows = block_on_bus(bus, |client| async move {
        let bus_name = client.checked_instance(instance).await?;
        client.windows(&bus_name).await
    })?;

    if args.json {
        println!("{}", render_windows_json(instance, &windows));
    } else {
        for line in render_windows_text(&windows) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn render_windows_json(instance: &str, windows: &BTreeMap<String, bool>) -> String {
    to_json(&WindowsBody { instance, windows })
}

pub fn render_windows_text(windows: &BTreeMap<String, bool>) -> Vec<String> {
    windows
        .iter()
        .map(|(name, visible)| format!("Window: {name} Visible: {visible}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        #[command(alias = "lw")]
        ListWindows(ListWindowsArgs),
    }

    fn sample() -> BTreeMap<String, bool> {
        let mut w = BTreeMap::new();
        w.insert("status-bar".to_string(), true);
        w.insert("launcher".to_string(), false);
        w
    }

    #[test]
    fn clap_parses_instance() {
        let cli = TestCli::try_parse_from(["t", "lw", "bar", "--json"]).unwrap();
        let TestSub::ListWindows(a) = cli.cmd;
        assert_eq!(a.instance.as_deref(), Some("bar"));
        assert!(a.json);
    }

    #[test]
    fn clap_accepts_missing_instance() {
        let cli = TestCli::try_parse_from(["t", "list-windows"]).unwrap();
        let TestSub::ListWindows(a) = cli.cmd;
        assert!(a.instance.is_none());
    }

    #[test]
    fn missing_instance_is_reported_before_bus_access() {
        let args = ListWindowsArgs {
            instance: None,
            json: false,
        };
        let bus = BusOptions {
            address: Some("not-a-bus-address".into()),
        };
        let err = execute_list_windows(&args, &bus).unwrap_err();
        assert_eq!(err.to_string(), "missing argument: instance");
    }

    #[test]
    fn text_sorted_by_name() {
        assert_eq!(
            render_windows_text(&sample()),
            vec![
                "Window: launcher Visible: false",
                "Window: status-bar Visible: true"
            ]
        );
    }

    #[test]
    fn json_shape() {
        assert_eq!(
            render_windows_json("bar", &sample()),
            "{\n\t\"instance\": \"bar\",\n\t\"windows\": {\n\t\t\"launcher\": false,\n\t\t\"status-bar\": true\n\t}\n}"
        );
    }
}

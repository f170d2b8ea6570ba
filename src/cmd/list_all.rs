/*!
`list_all.rs`

Implements `fabric-cli list-all` (alias `la`).

Behavior:
  - Asks the bus for every name and keeps the ones under `org.Fabric.fabric`.
  - JSON: only the bus names are reported (no per-instance calls).
  - Text: one `<instance>: <config file>` line per instance, printed as
    each `File` property is read. An instance that exits between the listing
    and the read is skipped.

JSON Output Shape:
{
	"instances-dbus-names": [
		"org.Fabric.fabric.bar"
	]
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cmd::format::to_json;
use crate::cmd::shared::{BusOptions, block_on_bus};
use crate::fabric::{FabricClient, InstanceInfo};
use crate::log_debug;

/// CLI arguments for `fabric-cli list-all`
#[derive(Args, Debug)]
pub struct ListAllArgs {
    /// Output JSON instead of human-readable text
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InstancesBody<'a> {
    #[serde(rename = "instances-dbus-names")]
    instances: &'a [String],
}

pub fn execute_list_all(args: &ListAllArgs, bus: &BusOptions) -> Result<()> {
    if args.json {
        let names = block_on_bus(bus, |client| async move { client.running_instances().await })?;
        println!("{}", render_names_json(&names));
        return Ok(());
    }

    block_on_bus(bus, |client| async move {
        let names = client.running_instances().await?;
        emit_instance_lines(&client, &names, |line| println!("{line}")).await
    })
}

/// Read each instance's `File` and hand its line to `emit` right away.
pub async fn emit_instance_lines(
    client: &FabricClient,
    bus_names: &[String],
    mut emit: impl FnMut(String),
) -> Result<()> {
    for bus_name in bus_names {
        let info = match client.instance_info(bus_name).await {
            Ok(info) => info,
            Err(e) => {
                if client.name_has_owner(bus_name).await.unwrap_or(false) {
                    return Err(e);
                }
                log_debug!("skipping {bus_name}, it went away: {e:#}");
                continue;
            }
        };
        emit(render_instance_line(&info));
    }
    Ok(())
}

pub fn render_names_json(names: &[String]) -> String {
    to_json(&InstancesBody { instances: names })
}

pub fn render_instance_line(info: &InstanceInfo) -> String {
    format!("{}: {}", info.name(), info.file)
}

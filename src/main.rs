use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

mod cmd;
mod fabric;
mod utils;

use cmd::{
    BusOptions, CompletionsArgs, EvaluateArgs, ExecuteArgs, ListAllArgs, ListWindowsArgs,
};

/// fabric-cli - talk to running Fabric instances over D-Bus
///
/// Command layout:
///   fabric-cli list-all      [--json]                      (alias: la)
///   fabric-cli list-windows  <instance> [--json]           (alias: lw)
///   fabric-cli execute       <instance> <source> [--json]  (alias: exec)
///   fabric-cli evaluate      <instance> <code> [--json]    (alias: eval)
///   fabric-cli completions   <bash|zsh|fish>
///
/// Global flags / env:
///   -v / -vv            Increase verbosity (logs go to stderr)
///   -q / --quiet        Errors only
///   --bus-address ADDR  Bus to use instead of the session bus (or FABRIC_BUS_ADDRESS env)
///
/// Instances:
///   "bar" resolves to the bus name org.Fabric.fabric.bar; a full
///   org.Fabric.fabric[...] name is used as-is.
///
/// Examples:
///   fabric-cli la
///   fabric-cli lw bar --json
///   fabric-cli exec bar "app.quit()"
///   echo "len(app.windows)" | fabric-cli eval bar -
#[derive(Parser, Debug)]
#[command(
    name = "fabric-cli",
    version,
    about = "fabric-cli - an alternative cli for fabric",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors (results are still printed)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// D-Bus address to connect to instead of the session bus
    #[arg(long = "bus-address", global = true, value_name = "ADDR")]
    bus_address: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all currently running fabric instances
    #[command(visible_alias = "la")]
    ListAll(ListAllArgs),

    /// List all windows within a running fabric instance
    #[command(visible_alias = "lw")]
    ListWindows(ListWindowsArgs),

    /// Execute Python code within a running fabric instance
    #[command(visible_alias = "exec")]
    Execute(ExecuteArgs),

    /// Evaluate a Python expression within a running fabric instance and return the result
    #[command(visible_alias = "eval")]
    Evaluate(EvaluateArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),

    /// Print running instance names (for shell completion)
    #[command(hide = true)]
    CompleteInstances,
}

impl Commands {
    /// Whether failures should be reported as JSON.
    fn json(&self) -> bool {
        match self {
            Commands::ListAll(a) => a.json,
            Commands::ListWindows(a) => a.json,
            Commands::Execute(a) => a.json,
            Commands::Evaluate(a) => a.json,
            Commands::Completions(_) | Commands::CompleteInstances => false,
        }
    }

    fn run(&self, bus: &BusOptions) -> Result<()> {
        match self {
            Commands::ListAll(args) => cmd::execute_list_all(args, bus),
            Commands::ListWindows(args) => cmd::execute_list_windows(args, bus),
            Commands::Execute(args) => cmd::execute_execute(args, bus),
            Commands::Evaluate(args) => cmd::execute_evaluate(args, bus),
            Commands::Completions(args) => cmd::execute_completions(args, &Cli::command()),
            Commands::CompleteInstances => cmd::execute_complete_instances(bus),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    // Effective bus address (CLI flag > FABRIC_BUS_ADDRESS env > session bus)
    let bus = BusOptions {
        address: utils::flag_or_env(cli.bus_address.clone(), "FABRIC_BUS_ADDRESS"),
    };

    if let Err(e) = cli.command.run(&bus) {
        log_debug!("command failed: {e:?}");
        println!(
            "{}",
            cmd::format::error_report(&format!("{e:#}"), cli.command.json())
        );
        std::process::exit(1);
    }
}

/*!
Command dispatcher module (declarations + re-exports only).

Layout:
  src/cmd/
    mod.rs           (this file)
    list_all.rs      (ListAllArgs     + execute_list_all)
    list_windows.rs  (ListWindowsArgs + execute_list_windows)
    execute.rs       (ExecuteArgs     + execute_execute)
    evaluate.rs      (EvaluateArgs    + execute_evaluate)
    complete.rs      (completion scripts + hidden instance feed)
    shared.rs        (runtime/bus bootstrap, argument checks)
    format.rs        (JSON / text / color helpers)

Conventions:
  - Each subcommand has exactly one public `execute_*` function
    that returns `anyhow::Result<()>` and prints its own success output.
  - Errors are returned, never printed here; `main` reports them.
  - Argument structs derive `clap::Args` and are kept minimal.
*/

pub mod complete;
pub mod evaluate;
pub mod execute;
pub mod format;
pub mod list_all;
pub mod list_windows;
pub mod shared;

pub use complete::{CompletionsArgs, execute_complete_instances, execute_completions};
pub use evaluate::{EvaluateArgs, execute_evaluate};
pub use execute::{ExecuteArgs, execute_execute};
pub use list_all::{ListAllArgs, execute_list_all};
pub use list_windows::{ListWindowsArgs, execute_list_windows};
pub use shared::BusOptions;

/*!
shared.rs - shared helpers for subcommands.

Focus:
  - block_on_bus: current-thread Tokio runtime + bus connection for one call
  - require_arg: positional presence check ("missing argument: <name>")
  - read_code_arg: `-` means stdin
*/

use anyhow::{Context, Result};
use std::future::Future;
use std::io::Read;

use crate::fabric::FabricClient;

/// Settings every subcommand needs to reach the bus.
#[derive(Debug, Clone, Default)]
pub struct BusOptions {
    /// Explicit bus address; session bus when `None`.
    pub address: Option<String>,
}

/// Build a runtime, connect, run `f` against the client.
///
/// `main` is sync; each command gets its own short-lived runtime.
pub fn block_on_bus<T, F, Fut>(opts: &BusOptions, f: F) -> Result<T>
where
    F: FnOnce(FabricClient) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    rt.block_on(async {
        let client = FabricClient::connect(opts.address.as_deref()).await?;
        f(client).await
    })
}

/// Positional arguments are optional at the clap level so that a missing one
/// goes through the regular (JSON-aware) error path.
pub fn require_arg<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => anyhow::bail!("missing argument: {name}"),
    }
}

/// Like `require_arg`, but `-` reads the whole of stdin.
pub fn read_code_arg(value: Option<&str>, name: &str) -> Result<String> {
    let raw = require_arg(value, name)?;
    if raw != "-" {
        return Ok(raw.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .with_context(|| format!("Failed to read {name} from stdin"))?;
    if buf.is_empty() {
        anyhow::bail!("missing argument: {name}");
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_arg_present() {
        assert_eq!(require_arg(Some("bar"), "instance").unwrap(), "bar");
    }

    #[test]
    fn require_arg_missing() {
        let err = require_arg(None, "instance").unwrap_err();
        assert_eq!(err.to_string(), "missing argument: instance");
    }

    #[test]
    fn require_arg_empty_counts_as_missing() {
        let err = require_arg(Some(""), "source").unwrap_err();
        assert_eq!(err.to_string(), "missing argument: source");
    }

    #[test]
    fn read_code_arg_passthrough() {
        assert_eq!(read_code_arg(Some("1 + 1"), "code").unwrap(), "1 + 1");
    }
}

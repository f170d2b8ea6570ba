/*!
format.rs

Output helpers shared by every subcommand.

  - StyleOptions::detect() -> StyleOptions
  - color(role, text, &StyleOptions) -> String
  - to_json(&value) -> String          (TAB-indented, like the rest of the Fabric tooling)
  - error_report(msg, json) -> String

Rendering functions return strings; the command modules do the printing.
JSON paths never go through `color`.
*/

use serde::Serialize;
use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    /// Color only when writing to a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        StyleOptions {
            use_color: !no_color && std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Error,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Error => "38;5;196", // red
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/// Pretty JSON with one TAB per level.
pub fn to_json<T: Serialize>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match value.serialize(&mut ser) {
        // serde_json only ever writes valid UTF-8
        Ok(()) => String::from_utf8(buf).unwrap_or_default(),
        Err(e) => e.to_string(),
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// What gets printed for a failed command.
pub fn error_report(msg: &str, json: bool) -> String {
    if json {
        to_json(&ErrorBody { error: msg })
    } else {
        msg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_tab_indent() {
        let out = to_json(&serde_json::json!({"a": [1]}));
        assert_eq!(out, "{\n\t\"a\": [\n\t\t1\n\t]\n}");
    }

    #[test]
    fn empty_array_stays_compact() {
        let out = to_json(&serde_json::json!({"a": []}));
        assert_eq!(out, "{\n\t\"a\": []\n}");
    }

    #[test]
    fn error_report_plain() {
        assert_eq!(
            error_report("missing argument: instance", false),
            "missing argument: instance"
        );
    }

    #[test]
    fn error_report_json() {
        assert_eq!(
            error_report("missing argument: instance", true),
            "{\n\t\"error\": \"missing argument: instance\"\n}"
        );
    }

    #[test]
    fn plain_style_has_no_ansi() {
        let s = color(Role::Error, "boom", &StyleOptions { use_color: false });
        assert_eq!(s, "boom");
    }

    #[test]
    fn colored_style_wraps_text() {
        let s = color(Role::Error, "boom", &StyleOptions { use_color: true });
        assert!(s.starts_with("\x1b["));
        assert!(s.contains("boom"));
        assert!(s.ends_with("\x1b[0m"));
    }
}

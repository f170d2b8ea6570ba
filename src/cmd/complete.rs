/*!
`complete.rs`

Shell completion.

  - `fabric-cli completions <bash|zsh|fish>` prints a completion script.
    Subcommand names and aliases come from the clap definition; commands
    that take an `<instance>` argument complete it by calling back into
    the binary.
  - hidden `fabric-cli complete-instances` is that callback: the short name
    of every running instance, one per line. Bus failures print nothing so
    a completion request never spews errors into the prompt.

Install (bash):
  fabric-cli completions bash > ~/.local/share/bash-completion/completions/fabric-cli
*/

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::cmd::shared::{BusOptions, block_on_bus};
use crate::fabric::instance_short_name;
use crate::log_debug;

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// CLI arguments for `fabric-cli completions <shell>`
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for
    pub shell: Shell,
}

const BASH_TEMPLATE: &str = r#"_@FN@() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    if [[ $COMP_CWORD -eq 1 ]]; then
        COMPREPLY=($(compgen -W "@COMMANDS@" -- "$cur"))
        return
    fi
    case "${COMP_WORDS[1]}" in
        @INSTANCE_CASE@)
            if [[ $COMP_CWORD -eq 2 ]]; then
                COMPREPLY=($(compgen -W "$(@BIN@ complete-instances 2>/dev/null)" -- "$cur"))
            fi
            ;;
    esac
}
complete -F _@FN@ @BIN@
"#;

const ZSH_TEMPLATE: &str = r#"#compdef @BIN@
_@FN@() {
    if (( CURRENT == 2 )); then
        compadd -- @COMMANDS@
    elif (( CURRENT == 3 )); then
        case $words[2] in
            @INSTANCE_CASE@)
                compadd -- ${(f)"$(@BIN@ complete-instances 2>/dev/null)"}
                ;;
        esac
    fi
}
compdef _@FN@ @BIN@
"#;

const FISH_TEMPLATE: &str = r#"complete -c @BIN@ -f
complete -c @BIN@ -n __fish_use_subcommand -a '@COMMANDS@'
complete -c @BIN@ -n '__fish_seen_subcommand_from @INSTANCE_WORDS@; and test (count (commandline -opc)) -eq 2' -a '(@BIN@ complete-instances 2>/dev/null)'
"#;

/// Visible subcommand names + aliases, and the subset taking `<instance>`.
fn subcommand_words(cmd: &clap::Command) -> (Vec<String>, Vec<String>) {
    let mut all = Vec::new();
    let mut with_instance = Vec::new();
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let mut words = vec![sub.get_name().to_string()];
        words.extend(sub.get_visible_aliases().map(str::to_string));
        if sub.get_arguments().any(|a| a.get_id().as_str() == "instance") {
            with_instance.extend(words.iter().cloned());
        }
        all.extend(words);
    }
    (all, with_instance)
}

pub fn render_script(shell: Shell, cmd: &clap::Command) -> String {
    let bin = cmd.get_name();
    let (all, with_instance) = subcommand_words(cmd);
    let template = match shell {
        Shell::Bash => BASH_TEMPLATE,
        Shell::Zsh => ZSH_TEMPLATE,
        Shell::Fish => FISH_TEMPLATE,
    };
    template
        .replace("@FN@", &bin.replace('-', "_"))
        .replace("@BIN@", bin)
        .replace("@COMMANDS@", &all.join(" "))
        .replace("@INSTANCE_CASE@", &with_instance.join("|"))
        .replace("@INSTANCE_WORDS@", &with_instance.join(" "))
}

pub fn execute_completions(args: &CompletionsArgs, cmd: &clap::Command) -> Result<()> {
    print!("{}", render_script(args.shell, cmd));
    Ok(())
}

pub fn execute_complete_instances(bus: &BusOptions) -> Result<()> {
    match block_on_bus(bus, |client| async move { client.running_instances().await }) {
        Ok(names) => {
            for name in completion_candidates(&names) {
                println!("{name}");
            }
        }
        Err(e) => log_debug!("instance completion unavailable: {e:#}"),
    }
    Ok(())
}

pub fn completion_candidates(bus_names: &[String]) -> Vec<&str> {
    bus_names.iter().map(|n| instance_short_name(n)).collect()
}

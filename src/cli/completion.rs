//! Shell completion generation for mwql
//!
//! Generates completion scripts for bash, zsh and fish with clap_complete and
//! extends them with completion of object type names for
//! `fields --object-type`.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};
use crate::vocabulary::ObjectType;

const BIN_NAME: &str = "mwql";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
///
/// # Returns
/// * `Result<String>` - The completion script
pub fn generate_completion(shell_name: &str) -> Result<String> {
    let shell = parse_shell(shell_name)?;
    let base = base_completion(shell);
    let object_types = object_type_words();

    let extension = match shell {
        Shell::Bash => format!(
            r#"
# Complete object type names after --object-type
_mwql_enhanced() {{
    local cur prev words cword
    _init_completion || return

    if [[ "$prev" == "--object-type" ]]; then
        COMPREPLY=($(compgen -W "{object_types}" -- "$cur"))
        return 0
    fi

    _mwql "$@"
}}

complete -F _mwql_enhanced {BIN_NAME}
"#
        ),
        Shell::Zsh => format!(
            r#"
# Complete object type names after --object-type
_mwql_enhanced() {{
    if [[ ${{words[CURRENT-1]}} == "--object-type" ]]; then
        local -a object_types
        object_types=({object_types})
        _describe 'object types' object_types
        return 0
    fi

    _mwql "$@"
}}

compdef _mwql_enhanced {BIN_NAME}
"#
        ),
        _ => format!(
            r#"
# Complete object type names after --object-type
complete -c {BIN_NAME} -n "__fish_seen_subcommand_from fields" -l object-type -f -a "{object_types}" -d "Object type"
"#
        ),
    };

    Ok(format!("{base}{extension}"))
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh, fish)"),
        }
        .into()),
    }
}

/// Completion script generated by clap_complete
fn base_completion(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn object_type_words() -> String {
    ObjectType::ALL
        .iter()
        .map(|object_type| object_type.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

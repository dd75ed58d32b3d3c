//! Icinga `CheckCommand` generation from a plugin's clap definition.

use std::process;

pub const GENERATE_ICINGA_COMMAND_ENV: &str = "GENERATE_ICINGA_COMMAND";

pub struct CommandDescription {
    arguments: Vec<ArgumentDescription>,
}

#[derive(Debug, PartialEq)]
pub struct ArgumentDescription {
    name: String,
    value: String,
    description: Option<String>,
    is_flag: bool,
    required: bool,
    position: Option<usize>,
    default_value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToIcingaCommandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
    #[error("error converting to command description: {0}")]
    CommandDescriptionFromError(#[from] CommandDescriptionFromError),
}

impl CommandDescription {
    pub fn arguments(&self) -> &[ArgumentDescription] {
        &self.arguments
    }

    /// Renders the command using the running executable, followed by `leading_args` (a
    /// subcommand name, for instance).
    pub fn to_icinga_command(
        &self,
        name: &str,
        leading_args: &[&str],
    ) -> Result<String, ToIcingaCommandError> {
        let current_exe = std::env::current_exe()?
            .to_str()
            .ok_or(ToIcingaCommandError::InvalidExecutablePath)?
            .to_owned();

        Ok(self.render(name, &current_exe, leading_args))
    }

    fn render(&self, name: &str, executable: &str, leading_args: &[&str]) -> String {
        let mut out = format!("object CheckCommand \"{name}\" {{\n");

        let command = std::iter::once(executable)
            .chain(leading_args.iter().copied())
            .map(|part| format!("\"{}\"", escape_string(part)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  command = [ {command} ]\n"));
        out.push_str("  arguments = {\n");

        for arg in &self.arguments {
            out.push_str(&format!("  \"{}\" = {{\n", arg.name));

            if arg.is_flag {
                out.push_str(&format!("    set_if = \"${}$\"\n", arg.value));
            } else {
                out.push_str(&format!("    value = \"${}$\"\n", arg.value));
            }

            if let Some(position) = arg.position {
                out.push_str("    skip_key = true\n");
                out.push_str(&format!("    order = {position}\n"));
            }

            if arg.required {
                out.push_str("    required = true\n");
            }

            if let Some(description) = &arg.description {
                out.push_str(&format!(
                    "    description = \"{}\"\n",
                    escape_string(description)
                ));
            }

            out.push_str("  }\n");
        }

        out.push_str("  }\n\n");

        for arg in &self.arguments {
            if let Some(default_value) = &arg.default_value {
                out.push_str(&format!(
                    "  vars.{} = \"{}\"\n",
                    arg.value,
                    escape_string(default_value)
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape_string(s: &str) -> String {
    ["\"", "$"]
        .iter()
        .fold(s.to_string(), |acc, c| acc.replace(c, &format!("\\{}", c)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandDescriptionFromError {
    #[error("argument {0} has neither a long name nor a position")]
    MissingLongArgument(String),
}

impl TryFrom<&clap::Command> for CommandDescription {
    type Error = CommandDescriptionFromError;

    fn try_from(cmd: &clap::Command) -> Result<Self, Self::Error> {
        let mut arguments = Vec::new();
        let mut positionals = 0;

        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str().to_owned();
            let position = if arg.is_positional() {
                positionals += 1;
                Some(positionals)
            } else {
                None
            };

            let name = match (arg.get_long(), position) {
                (Some(long), _) => format!("--{long}"),
                (None, Some(_)) => id.clone(),
                (None, None) => return Err(CommandDescriptionFromError::MissingLongArgument(id)),
            };

            let value = arg.get_long().unwrap_or(id.as_str()).replace('-', "_");
            let description = arg.get_help().map(|s| s.to_string());
            let is_flag = !arg.get_action().takes_values();

            let default_value = arg
                .get_default_values()
                .first()
                .and_then(|v| v.to_str())
                .map(|s| s.to_string());

            arguments.push(ArgumentDescription {
                name,
                value,
                description,
                is_flag,
                required: arg.is_required_set(),
                position,
                default_value,
            });
        }

        Ok(CommandDescription { arguments })
    }
}

/// Print the Icinga command configuration if the GENERATE_ICINGA_COMMAND environment variable
/// is set and exit the process.
pub fn print_icinga_command_config_if_env_and_exit(
    name: &str,
    leading_args: &[&str],
    cmd: &clap::Command,
) -> Result<(), ToIcingaCommandError> {
    if std::env::var_os(GENERATE_ICINGA_COMMAND_ENV).is_none() {
        return Ok(());
    }

    let description = CommandDescription::try_from(cmd)?;
    let out = description.to_icinga_command(name, leading_args)?;

    println!("{}", out.trim());
    process::exit(0);
}

//! Plumbing shared by the plugin binaries: flag parsing, Icinga command generation and
//! termination handling.

use std::ffi::OsString;
use std::process;

use clap::Parser;
use tracing::warn;

use crate::config_generator;
use crate::logging::Logging;
use crate::{Resource, ServiceState};

/// Exit code for malformed command lines. Usage errors never reach the status mapping.
pub const USAGE_ERROR_EXIT_CODE: i32 = 1;

/// Sets up logging and termination handling for the plugin called `plugin_name`.
pub fn init(plugin_name: &str) {
    if let Err(err) = Logging::try_init() {
        eprintln!("{err}");
    }
    exit_unknown_on_termination(plugin_name);
}

/// Parses `args` into `P`, exiting with [USAGE_ERROR_EXIT_CODE] on malformed input. `--help`
/// and `--version` exit successfully.
pub fn parse_args_or_exit<P, I, T>(args: I) -> P
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            let code = usage_exit_code(&err);
            // nothing left to report to if stdout or stderr are gone
            let _ = err.print();
            process::exit(code);
        }
    }
}

fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        USAGE_ERROR_EXIT_CODE
    } else {
        0
    }
}

/// Prints the Icinga `CheckCommand` for `cmd` and exits when `GENERATE_ICINGA_COMMAND` is set.
pub fn generate_icinga_command_if_requested(
    name: &str,
    leading_args: &[&str],
    cmd: &clap::Command,
) {
    if let Err(err) =
        config_generator::print_icinga_command_config_if_env_and_exit(name, leading_args, cmd)
    {
        eprintln!("{name}: {err}");
        process::exit(USAGE_ERROR_EXIT_CODE);
    }
}

fn interrupted(plugin_name: &str) -> Resource {
    Resource::new(plugin_name)
        .with_state(ServiceState::Unknown)
        .with_description("interrupted")
}

/// On SIGINT or SIGTERM, report UNKNOWN instead of leaving the agent with no status line.
pub fn exit_unknown_on_termination(plugin_name: &str) {
    let name = plugin_name.to_owned();
    let installed = ctrlc::set_handler(move || {
        interrupted(&name).print_and_exit();
    });

    if let Err(err) = installed {
        warn!(%err, "could not install the termination handler");
    }
}

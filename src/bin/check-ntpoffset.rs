use clap::CommandFactory;

use check_plugins::cli;
use check_plugins::ntp::{self, Args, SystemHost, PLUGIN_NAME};
use check_plugins::safe_run;

fn main() {
    cli::init(PLUGIN_NAME);
    cli::generate_icinga_command_if_requested("check-ntpoffset", &[], &Args::command());

    let args: Args = cli::parse_args_or_exit(std::env::args_os());

    safe_run(PLUGIN_NAME, || ntp::run(&args, &SystemHost)).print_and_exit()
}

use clap::CommandFactory;

use check_plugins::cli;
use check_plugins::cloudwatch_logs::{self, Args, CloudWatchLogsClient, PAGE_DELAY, PLUGIN_NAME};
use check_plugins::Runner;

fn main() {
    cli::init(PLUGIN_NAME);
    cli::generate_icinga_command_if_requested("check-cloudwatch-logs", &[], &Args::command());

    let args: Args = cli::parse_args_or_exit(std::env::args_os());

    Runner::new(PLUGIN_NAME)
        .safe_run(|| {
            let client = CloudWatchLogsClient::new(&args)?;
            cloudwatch_logs::run(&args, &client, PAGE_DELAY)
        })
        .print_and_exit()
}

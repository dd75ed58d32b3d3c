use std::process;

use clap::CommandFactory;

use check_plugins::cli;
use check_plugins::mysql::{
    self, ConnectionArgs, MysqlCheck, ReadonlyArgs, ReplicationArgs, Subcommand, UptimeArgs,
};
use check_plugins::Runner;

fn main() {
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let (program, rest) = match args.split_first() {
        Some((program, rest)) => (program.as_str(), rest),
        None => ("check-mysql", &[][..]),
    };

    let (subcommand, rest) = mysql::separate_sub(rest);
    match subcommand {
        Subcommand::Connection => run_check::<ConnectionArgs>(&subcommand, program, rest),
        Subcommand::Readonly => run_check::<ReadonlyArgs>(&subcommand, program, rest),
        Subcommand::Replication => run_check::<ReplicationArgs>(&subcommand, program, rest),
        Subcommand::Uptime => run_check::<UptimeArgs>(&subcommand, program, rest),
        Subcommand::Unknown(_) => {
            print!("{}", mysql::usage());
            process::exit(cli::USAGE_ERROR_EXIT_CODE);
        }
    }
}

fn run_check<A: MysqlCheck>(subcommand: &Subcommand, program: &str, rest: &[String]) -> ! {
    let plugin_name = subcommand.plugin_name();
    cli::init(&plugin_name);
    cli::generate_icinga_command_if_requested(
        &format!("check-mysql-{}", subcommand.name()),
        &[subcommand.name()],
        &A::command(),
    );

    let bin_name = format!("{program} {}", subcommand.name());
    let args: A = cli::parse_args_or_exit(
        std::iter::once(bin_name.as_str()).chain(rest.iter().map(String::as_str)),
    );

    Runner::new(&plugin_name)
        .safe_run(|| mysql::run(&args))
        .print_and_exit()
}

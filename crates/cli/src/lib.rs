pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopchat",
    about = "Shopchat operator CLI",
    long_about = "Inspect shopchat configuration, check catalog and remote readiness, and try chat messages locally.",
    after_help = "Examples:\n  shopchat doctor --json\n  shopchat config\n  shopchat ask \"show clothing under 1000\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, load the local catalog, and optionally probe the remote source")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Also fetch once from the remote product source")]
        remote: bool,
    },
    #[command(about = "Route one chat message through the assistant and print the reply payload")]
    Ask {
        message: String,
        #[arg(long, help = "Consult the remote product source when the config enables it")]
        remote: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json, remote } => commands::doctor::run(json, remote),
        Command::Ask { message, remote } => commands::ask::run(&message, remote),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "chatci",
    about = "chatci operator CLI",
    long_about = "Inspect slash command parsing and dispatch offline, check configuration, and verify Jenkins credentials.",
    after_help = "Examples:\n  chatci parse '\"folder with space/app\"' 22 BRANCH=main\n  chatci dispatch 'build app BRANCH=main'\n  chatci config\n  JENKINS_API_TOKEN=... chatci verify --username alice"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Parse job arguments into job name, build number and build parameters")]
    Parse {
        #[arg(long, conflicts_with = "tokens", help = "Raw argument text, split on whitespace")]
        text: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = "Argument tokens")]
        tokens: Vec<String>,
    },
    #[command(about = "Route slash command text through the dispatcher without contacting Jenkins")]
    Dispatch {
        #[arg(long, default_value = "/jenkins", help = "Slash command trigger word")]
        trigger: String,
        #[arg(help = "Command text, e.g. 'get-log app 12'")]
        text: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Check Jenkins credentials against the configured server")]
    Verify {
        #[arg(long, help = "Jenkins username; the token is read from JENKINS_API_TOKEN")]
        username: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse { text, tokens } => commands::parse::run(text.as_deref(), &tokens),
        Command::Dispatch { trigger, text } => commands::dispatch::run(&text, &trigger),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Verify { username } => commands::verify::run(&username),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

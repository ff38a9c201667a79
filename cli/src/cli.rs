use crate::commands::Commands;
use crate::error::Error;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    name = "infra",
    version,
    about = "Synthesize CloudFormation templates for the sample apps",
    long_about = "Declares parameters, secrets, topics and queues of the sample apps and renders them into CloudFormation templates. Deploying the templates is left to the provisioning tool of your choice."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file, infra.toml in the current dir by default
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,
}

/// Run the parsed command
pub fn run(cli: Cli) -> Result<(), Error> {
    Logger::init();
    let writer = Writer::new(cli.json);

    // Match all commands here, in one place
    match &cli.command {
        Commands::List(cmd) => cmd.runner(&writer, cli.config.clone()).run(),
        Commands::Synth(cmd) => cmd.runner(&writer, cli.config.clone()).run(),
    }
}

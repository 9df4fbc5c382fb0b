mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::{format, query, repl, terms};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = context::load_config(cli.config.as_deref())?;
    let output_format = cli.format;

    match cli.command {
        Command::Query(cmd) => query::run(cmd, &config, output_format),
        Command::Terms(cmd) => terms::run(cmd, output_format),
        Command::Format(cmd) => format::run(cmd, &config),
        Command::Repl { file } => repl::run(file.as_deref(), &config, output_format),
    }
}

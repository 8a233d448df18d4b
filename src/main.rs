mod cli;
mod client;
mod commands;
mod config;
mod groovy;
mod resources;
mod script;
mod state;
mod statefile;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, ScriptCommand, ServerCommand};
use client::NexusClient;
use config::ServerConfig;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let config = ServerConfig::load()?.with_overrides(
        cli.url.clone(),
        cli.username.clone(),
        cli.password.clone(),
        cli.timeout,
    );
    let client = NexusClient::new(&config);

    match cli.command {
        Commands::Status(args) => commands::apply::status(&client, &args.file, args.json),
        Commands::Diff(args) => commands::apply::diff(&client, &args.file, args.json),
        Commands::Apply(args) => {
            commands::apply::apply(&client, &args.file, args.dry_run, args.json)
        }
        Commands::Script(cmd) => match cmd {
            ScriptCommand::List => commands::script::list(&client),
            ScriptCommand::Get { name } => commands::script::get(&client, &name),
            ScriptCommand::Upload { name, file } => {
                commands::script::upload(&client, &name, &file)
            }
            ScriptCommand::Run { name, args } => commands::script::run(&client, &name, &args),
            ScriptCommand::Delete { name } => commands::script::delete(&client, &name),
        },
        Commands::Server(cmd) => match cmd {
            ServerCommand::BaseUrl { url } => commands::server::base_url(&client, &url),
            ServerCommand::Task(args) => commands::server::task(&client, &args),
        },
        Commands::Email(args) => commands::email::verify(&client, &args.to),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "nexusctl", &mut io::stdout());
            Ok(())
        }
    }
}

//! nlquery CLI
//!
//! Natural language questions over a vulnerability and component index.

use anyhow::Result;
use clap::Parser;
use nlquery_core::error::exit_codes;
use nlquery_core::{Config, NlQueryError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    if cli.verbose {
        if let Ok(directive) = "nlquery_core=debug".parse::<tracing_subscriber::filter::Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    // stdout carries results (and MCP frames); logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<NlQueryError>()
                .map(NlQueryError::exit_code)
                .unwrap_or(exit_codes::GENERAL_ERROR)
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load()?;

    let result = match cli.command {
        Commands::Ask(args) => return commands::ask::run(args, &config, cli.format).await,
        Commands::Prompt(args) => commands::prompt::run(args, &config).await,
        Commands::Schema(args) => commands::schema::run(args, &config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config),
        Commands::Mcp => commands::mcp::run(&config).await,
    };

    result.map(|_| exit_codes::SUCCESS)
}

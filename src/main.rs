mod cli;
mod config;
mod error;
mod loader;
mod pipeline;
mod record;
mod source;
mod store;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, Cli, Commands};
use source::OccurrenceQuery;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Gbif {
            continent,
            taxon_key,
            limit,
            offset,
            target,
        } => {
            let query = OccurrenceQuery {
                continent: continent.clone(),
                taxon_key: *taxon_key,
                limit: *limit,
                offset: *offset,
            };
            command::gbif(query, target).await
        }
        Commands::Haedat { input, target } => command::haedat(input, target).await,
        Commands::Verify { table, limit } => command::verify(table, *limit).await,
    };

    match result {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

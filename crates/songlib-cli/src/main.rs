//! SongLib CLI
//!
//! Runs the song catalog service and its schema migrations

use clap::{Parser, Subcommand};

mod app;
mod commands;

#[derive(Debug, Parser)]
#[command(name = "songlib")]
#[command(about = "SongLib - song and verse catalog service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply migrations, then serve the HTTP API until Ctrl-C
    Serve,
    /// Schema migration operations
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve => commands::serve::execute().await,
        Commands::Migrate(args) => commands::migrate::execute(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

//! Command-line interface for mouse_cat_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mouse & Cat - two-player board game server
#[derive(Parser, Debug)]
#[command(name = "mouse_cat_server")]
#[command(about = "Cat-and-mouse game server with a JSON HTTP API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and DATABASE_URL)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Apply database migrations and exit
    Migrate,

    /// Set the rejected-request counter back to zero
    ResetCounter,
}

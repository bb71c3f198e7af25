//! Mouse & Cat server CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use mouse_cat_server::{GameRepository, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env()?;

    match cli.command {
        Command::Http { port, host } => {
            let config = config.with_overrides(host, port, cli.db_path);
            run_http_server(config).await
        }
        Command::Migrate => {
            let config = config.with_overrides(None, None, cli.db_path);
            open_repository(&config)?;
            Ok(())
        }
        Command::ResetCounter => {
            let config = config.with_overrides(None, None, cli.db_path);
            open_repository(&config)?.reset_counter()?;
            Ok(())
        }
    }
}

/// Opens the database and brings its schema up to date.
fn open_repository(config: &ServerConfig) -> Result<GameRepository> {
    let repo = GameRepository::new(config.database_url().clone())?
        .with_page_size(*config.page_size());
    repo.run_migrations()?;
    Ok(repo)
}

/// Run the HTTP game server
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repo = open_repository(&config)?;
    let app = router(repo);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        database = %config.database_url(),
        "Server ready at http://{}:{}/",
        config.host(),
        config.port()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repoassist::server::{app_router, AppState};
use repoassist::{Config, GitHubClient, RepositoryAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "repoassist")]
#[command(version = "0.1.0")]
#[command(about = "Smart repository assistant: issue triage webhooks and repo analytics")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the webhook and analytics HTTP server (default)
    Serve {
        /// Bind address, overrides BIND_HOST
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides BIND_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a one-shot analytics report
    Report {
        /// Repository (owner/name), defaults to DEFAULT_REPO
        #[arg(short, long)]
        repo: Option<String>,

        /// Write the report to this file instead of a timestamped one
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("repoassist=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let github = Arc::new(GitHubClient::new(&config.github_token)?);

    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            let bind_host = host.unwrap_or_else(|| config.bind_host.clone());
            let bind_port = port.unwrap_or(config.bind_port);
            let bind_address = format!("{}:{}", bind_host, bind_port);

            let state = Arc::new(AppState::new(config, github));
            let router = app_router(state);

            tracing::info!("Webhook endpoint: http://{}/webhook", bind_address);
            tracing::info!("Health endpoint: http://{}/health", bind_address);
            tracing::info!("Analytics endpoint: http://{}/analytics", bind_address);

            let listener = tokio::net::TcpListener::bind(&bind_address).await?;
            axum::serve(listener, router).await?;
        }
        Command::Report { repo, output } => {
            let repo = repo.unwrap_or_else(|| config.default_repo.clone());
            tracing::info!("Generating analytics report for {}", repo);

            let analyzer = RepositoryAnalyzer::new(github, repo);
            let path = analyzer.export_json(output).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

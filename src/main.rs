//! PromptForge server binary

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use promptforge::config::{Config, DEFAULT_CONFIG_PATH};
use promptforge::server::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "promptforge", version, about = "AI prompt builder backend")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "PROMPTFORGE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: &str) -> promptforge::Result<()> {
    let config = Config::from_file(config_path).await?;
    let server = HttpServer::new(config)?;
    server.start().await
}

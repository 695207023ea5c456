use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use stackbot::chatbot::ResponseGenerator;
use stackbot::config::{Config, Credentials};
use stackbot::llm::ProviderRegistry;
use stackbot::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "stackbot", version, about = "Chatbot backend with AI providers and a rule-based fallback")]
struct Args {
    /// Path to the YAML config file (missing file means defaults).
    #[arg(short, long, env = "STACKBOT_CONFIG", default_value = "stackbot.yaml")]
    config: PathBuf,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; keys may come from the real environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,stackbot=debug")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .await
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let credentials = Credentials::from_env();
    let providers = ProviderRegistry::from_credentials(&credentials, &config.chatbot)
        .context("building provider HTTP client")?;
    let generator = ResponseGenerator::new(providers, &config.chatbot);

    let state = AppState {
        generator: Arc::new(generator),
    };
    let app = server::build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "stackbot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("stackbot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

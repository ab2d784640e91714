//! # DocGate — documentation-search chat backend
//!
//! Retrieval: cloud document search over a configured serving config.
//! Generation: Vertex AI Gemini with a citation-constrained prompt.
//!
//! Usage:
//!   docgate                  # Start the gateway (default 127.0.0.1:3000)
//!   docgate --port 8080      # Custom port
//!   docgate --no-generation  # Deterministic fallback answers only

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docgate_auth::{ServiceAccountKey, TokenSource};
use docgate_core::config::DocGateConfig;
use docgate_gateway::AppState;
use docgate_retrieval::SearchClient;
use docgate_synthesis::gemini::GeminiClient;

#[derive(Parser)]
#[command(
    name = "docgate",
    version,
    about = "📚 DocGate — documentation-search chat backend"
)]
struct Cli {
    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML config file (env vars still take precedence)
    #[arg(short, long)]
    config: Option<String>,

    /// Disable the generative-model stage
    #[arg(long)]
    no_generation: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "docgate=debug,tower_http=debug"
    } else {
        "docgate=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Defaults → optional TOML file → env → CLI flags. Fatal on anything the
    // server cannot run without.
    let mut config = match &cli.config {
        Some(path) => DocGateConfig::load_from(std::path::Path::new(path))?,
        None => DocGateConfig::load()?,
    };
    config.apply_env();
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if cli.no_generation {
        config.generation.enabled = false;
    }
    config.validate()?;
    tracing::debug!("Configuration resolved and validated");

    // One outbound client for everything: search, generation, token exchange.
    let http = reqwest::Client::builder()
        .user_agent(config.http.user_agent.clone())
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
        .build()?;

    let key = ServiceAccountKey::from_json(&config.google_key)?;
    let service_account = key.client_email.clone();
    let token = Arc::new(TokenSource::new(key, http.clone())?);

    let search = SearchClient::new(config.retrieval.clone(), token.clone(), http.clone())?;
    let model = if config.generation.enabled {
        let generation = config
            .generation
            .clone()
            .with_project_fallback(&config.retrieval.project);
        Some(GeminiClient::new(generation, token.clone(), http.clone())?)
    } else {
        None
    };

    println!("📚 DocGate v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   🌐 Gateway:    http://{}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("   🔑 Account:    {service_account}");
    println!(
        "   🔎 Retrieval:  {} serving-config candidate(s)",
        search.candidate_count()
    );
    match &model {
        Some(m) => println!("   ✨ Generation: {}", m.model()),
        None => println!("   ✨ Generation: disabled (deterministic fallback answers)"),
    }
    println!();

    docgate_gateway::start(AppState {
        config,
        search,
        model,
        start_time: std::time::Instant::now(),
    })
    .await
}

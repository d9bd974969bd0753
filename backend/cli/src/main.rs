mod api;
mod config;
mod session;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use storymap_acquire::OcrEngine;
use storymap_extract::GeminiExtractor;
use storymap_maps::{Directions, Geocoder};
use storymap_store::MapStore;

use api::AppState;
use config::Config;
use session::Session;

#[derive(Parser)]
#[command(name = "storymap")]
#[command(about = "Storymap — turn stories into interactive maps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Storymap server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status {
        /// Port the server was started on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status { port } => {
            let port = port.unwrap_or(config.port);
            println!("Storymap status: checking...");
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{port}/api/health"))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("Storymap is not running on port {port}");
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        data_dir = %config.data_dir,
        "Starting Storymap server"
    );

    let gemini = match &config.gemini_api_key {
        Some(key) => {
            info!("Registered Gemini extractor");
            Some(GeminiExtractor::new(key))
        }
        None => {
            warn!("GEMINI_API_KEY not set; LLM extraction disabled");
            None
        }
    };

    let (geocoder, directions) = match &config.maps_api_key {
        Some(key) => {
            info!("Registered Google geocoding and directions");
            (Some(Geocoder::new(key)), Some(Directions::new(key)))
        }
        None => {
            warn!("GOOGLE_MAPS_API_KEY not set; geocoding and routing disabled");
            (None, None)
        }
    };

    let state = Arc::new(AppState {
        session: Mutex::new(Session::default()),
        store: MapStore::new(&config.data_dir),
        http: reqwest::Client::new(),
        ocr: OcrEngine::default(),
        gemini,
        geocoder,
        directions,
        maps_api_key: config.maps_api_key.clone(),
    });

    let app = api::build_router(state).layer(CorsLayer::permissive());
    let addr = format!("{}:{}", config.bind_address, config.port);

    info!(addr = %addr, "HTTP API listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Incidex — turn free-text incident reports into structured records.

use std::sync::Arc;

use incidex_core::ServerConfig;
use incidex_llm::OllamaConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn print_help() {
    println!("Incidex — incident extraction service");
    println!();
    println!("Usage: incidex [command]");
    println!();
    println!("Commands:");
    println!("  (none)                   Start the HTTP server");
    println!("  extract <text...>        Extract one incident and print it as JSON");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  HOST, PORT                       Bind address (default 0.0.0.0:8000)");
    println!("  INCIDEX_REQUEST_TIMEOUT_SECS     Per-request deadline (default 60)");
    println!("  OLLAMA_BASE_URL, OLLAMA_MODEL    Backend location and model");
    println!("  OLLAMA_TIMEOUT_SECS              Backend call timeout (default 30)");
}

async fn extract_once(text: &str) -> anyhow::Result<()> {
    let state = AppState::with_ollama(ServerConfig::from_env(), OllamaConfig::from_env())?;
    let info = state.pipeline.extract(text).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "extract" => {
                if args.len() < 3 {
                    eprintln!("Usage: incidex extract <incident text>");
                    std::process::exit(1);
                }
                let text = args[2..].join(" ");
                if let Err(e) = extract_once(&text).await {
                    eprintln!("Extraction failed: {}", e);
                    std::process::exit(1);
                }
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'incidex help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = ServerConfig::from_env();
    let backend = OllamaConfig::from_env();
    info!(
        "Using Ollama at {} with model {}",
        backend.base_url, backend.model
    );

    let addr = config.bind_addr();
    let state = Arc::new(AppState::with_ollama(config, backend)?);
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Incidex server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

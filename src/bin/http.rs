#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use study_pacer::http_api::{self, AppState, SharedDeckStore};
    use study_pacer::{JsonDeckStore, MemoryDeckStore, PlannerConfig};
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("STUDY_PACER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("STUDY_PACER_CONFIG") {
        Ok(path) => PlannerConfig::load_json(path)?,
        Err(_) => PlannerConfig::default(),
    };

    let decks: SharedDeckStore = match std::env::var("STUDY_PACER_DECKS") {
        Ok(path) => Arc::new(JsonDeckStore::open(path)?),
        Err(_) => Arc::new(MemoryDeckStore::default()),
    };

    http_api::serve(addr, AppState::new(config.planner(), decks)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}

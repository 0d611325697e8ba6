use std::net::SocketAddr;
use std::sync::Arc;

use server::config::Settings;
use server::embedding::OpenAiEmbedder;
use server::rest;
use server::state::AppState;
use server::store::supabase::SupabaseStore;
use server::telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_telemetry();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Startup failed: {e}");
            std::process::exit(1);
        }
    };

    if settings.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; retrieval will be lexical-only");
    }

    let store = Arc::new(SupabaseStore::new(&settings));
    let embedder = Arc::new(OpenAiEmbedder::new(&settings));
    let port = settings.port;

    let state = AppState {
        store,
        embedder,
        settings: Arc::new(settings),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(%addr, "sentencing service listening");

    axum::serve(listener, rest::app(state))
        .await
        .expect("server error");
}

mod config;
mod error;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let protected = services::guard::ProtectedRoutes::from_prefixes(&config.protected_prefixes)
        .expect("invalid PROTECTED_PREFIXES");
    for route in protected.iter() {
        tracing::info!(prefix = %route.prefix, role = %route.role, "protected area");
    }

    let backend = services::backend::HttpBackend::new(config.backend_url.clone(), config.backend_timeout_secs)
        .expect("backend client init failed");

    let port = config.port;
    let state = state::AppState::new(config, protected, Arc::new(backend));
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "oskar edge listening");
    axum::serve(listener, app).await.expect("server failed");
}

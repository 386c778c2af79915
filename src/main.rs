//! Team Draw - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:3000

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use team_draw::api;
use team_draw::audit::AuditLog;
use team_draw::prefs::PrefStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("team_draw=info".parse().unwrap()),
        )
        .init();

    let audit = AuditLog::new("logs").expect("failed to prepare logs directory");
    let prefs = PrefStore::open("preferences.json");
    let state = Arc::new(api::AppState::new(audit, prefs));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .fallback_service(ServeDir::new("static"))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

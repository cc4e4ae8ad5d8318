use std::sync::Arc;

use dentalis_store::PgStore;

#[tokio::main]
async fn main() {
    dentalis_observability::init();

    let config = dentalis_api::Config::from_env();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::warn!("DATABASE_URL not set; using local dev default");
        "postgres://localhost/dentalis".to_string()
    });
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let store = PgStore::connect(&database_url)
        .await
        .expect("failed to connect to database");

    let app = dentalis_api::app::build_app(config, Arc::new(store)).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

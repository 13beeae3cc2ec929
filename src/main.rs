use std::{net::Ipv4Addr, sync::Arc};

use tracing::info;
use tracing_subscriber::EnvFilter;

use tasklist::{config::Config, create_app, db, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("reading configuration");

    let db = db::init_db(&config.db_path).expect("initializing database");
    info!(path = %config.db_path.display(), "opened database");

    let state = AppState {
        db,
        base_path: Arc::new(config.base_path),
    };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("binding listener");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}

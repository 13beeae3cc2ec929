pub mod assets;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub base_path: Arc<String>,
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.base_path.clone();

    let app_routes = Router::new()
        .route("/", get(handlers::web::index))
        .route("/static/{*path}", get(handlers::web::static_file))
        .route("/rpc/healthcheck", get(handlers::rpc::healthcheck))
        .route("/rpc/getTodos", get(handlers::rpc::get_todos))
        .route("/rpc/getTodo", get(handlers::rpc::get_single_todo))
        .route("/rpc/createTodo", post(handlers::rpc::create_new_todo))
        .route("/rpc/updateTodo", post(handlers::rpc::update_existing_todo))
        .route("/rpc/toggleTodo", post(handlers::rpc::toggle_existing_todo))
        .route("/rpc/deleteTodo", post(handlers::rpc::delete_existing_todo))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&*base_path, app_routes)
    }
}

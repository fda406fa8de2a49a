pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod validate;

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, put},
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

    // Routes whose query or body fields go through the validator.
    let validated = Router::new()
        .route(
            "/todos",
            get(handlers::api::list_all_todos).post(handlers::api::create_new_todo),
        )
        .route(
            "/todos/",
            get(handlers::api::list_all_todos).post(handlers::api::create_new_todo),
        )
        .route("/todos/{id}", put(handlers::api::update_existing_todo))
        .route("/todos/{id}/", put(handlers::api::update_existing_todo))
        .route_layer(from_fn(middleware::validate_fields));

    let app_routes = Router::new()
        .route(
            "/todos/{id}",
            get(handlers::api::get_single_todo).delete(handlers::api::delete_existing_todo),
        )
        .route(
            "/todos/{id}/",
            get(handlers::api::get_single_todo).delete(handlers::api::delete_existing_todo),
        )
        .route("/agenda", get(handlers::api::agenda))
        .route("/agenda/", get(handlers::api::agenda))
        .route("/schema", get(handlers::api::describe_schema))
        .route("/schema/", get(handlers::api::describe_schema))
        .merge(validated)
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

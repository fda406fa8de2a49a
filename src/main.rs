use std::{net::Ipv4Addr, sync::Arc};

use tracing::info;

use todo_agenda::{create_app, db, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("AGENDA_PORT")
        .map(|port| port.parse().expect("AGENDA_PORT to be a port number"))
        .unwrap_or(3000);

    let database = std::env::var("AGENDA_DATABASE").unwrap_or_else(|_| "todos.db".to_string());

    let base_path = std::env::var("AGENDA_BASE_PATH")
        .ok()
        .map(|path| {
            let path = path.trim_end_matches('/');
            if path.is_empty() || path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            }
        })
        .unwrap_or_default();

    let db = db::init_db(&database).expect("initializing database");
    info!(%database, "opened datastore");

    let state = AppState {
        db,
        base_path: Arc::new(base_path),
    };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}

//! Axum application setup.

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Inspection
        .route("/documents/:collection/:id", get(handlers::get_document))
        .route("/audit", get(handlers::get_audit))
        // Artworks
        .route("/artworks", post(handlers::create_artwork))
        .route("/artworks/:id", delete(handlers::delete_artwork))
        .route("/artworks/:id/assign", post(handlers::assign_artwork))
        .route("/artworks/:id/reject", post(handlers::reject_artwork))
        .route("/artworks/:id/reassign", post(handlers::reassign_artwork))
        .route("/artworks/:id/shown", post(handlers::mark_shown))
        // Artists
        .route("/artists/:id/accept", post(handlers::accept_artist))
        .route("/artists/:id/remove", post(handlers::remove_artist))
        // Curation order
        .route(
            "/shows/:id/order",
            post(handlers::append_to_order).put(handlers::reorder),
        )
        .route(
            "/shows/:id/order/:artwork_id",
            delete(handlers::remove_from_order),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

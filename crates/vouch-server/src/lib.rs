pub mod command;
pub mod error;
pub mod handlers;
pub mod race;
pub mod registrar;
pub mod render;
pub mod reply;
pub mod routes;
pub mod signature;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router: the signed interactions endpoint plus a health
/// probe. Used by `start()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/interactions",
            post(routes::interactions::receive).route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                signature::verify_signature,
            )),
        )
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Register commands, log the bot identity, then listen on the configured
/// port until the process is stopped.
pub async fn start(app_state: AppState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", app_state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(listener, app_state).await
}

/// Like `start`, on a pre-bound listener so the caller can pick port 0 and
/// read the real port back.
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    app_state: AppState,
) -> anyhow::Result<()> {
    registrar::register_commands_at_startup(app_state.api.as_ref(), &app_state.config).await;

    match app_state.api.current_user().await {
        Ok(user) => tracing::info!("Logged in as {}", user.tag()),
        Err(e) => tracing::warn!("could not fetch bot user: {e}"),
    }

    let port = listener.local_addr()?.port();
    tracing::info!("vouchbot listening on http://localhost:{port}/interactions");

    axum::serve(listener, build_router(app_state)).await?;
    Ok(())
}

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod evaluate;
pub mod guardians;
mod health;
pub mod session;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let guardian_router = Router::new()
        .route("/", post(guardians::routes::create).get(guardians::routes::list))
        .route(
            "/{guardian_id}",
            get(guardians::routes::get).delete(guardians::routes::delete),
        );

    let session_router = Router::new()
        .route("/", get(session::routes::get))
        .route("/timer", post(session::routes::start_timer))
        .route("/timer/arrive", post(session::routes::arrive))
        .route("/alert", post(session::routes::alert))
        .route("/location", post(session::routes::location));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .route("/evaluate", post(evaluate::routes::evaluate))
                .nest("/guardians", guardian_router)
                .nest("/session", session_router),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn root() -> &'static str {
    "Home-safe companion API"
}

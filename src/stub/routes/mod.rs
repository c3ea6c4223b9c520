use axum::Router;

use crate::stub::state::AppState;

pub mod auth_routes;
pub mod booking_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            auth_routes::router().merge(booking_routes::router()),
        )
        .with_state(state)
}

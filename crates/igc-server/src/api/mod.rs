//! API routes for the track service.

pub mod meta;
mod routes;
pub mod tracks;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;

use crate::state::AppState;
use axum::Router;

mod dto;
pub mod error;
pub mod handlers;
mod groups;
pub mod model;
pub mod policy;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::find_routes())
        .merge(handlers::write_routes())
}

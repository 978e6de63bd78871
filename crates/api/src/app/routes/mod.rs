use axum::{routing::get, Router};

pub mod facets;
pub mod list;
pub mod system;

/// Router for the catalog endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/list", get(list::list_products))
        .route("/facets", get(facets::get_facets))
}

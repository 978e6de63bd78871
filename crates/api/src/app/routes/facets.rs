use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto;
use crate::app::services::AppServices;

/// `GET /api/facets`: filter targets plus the catalog's price limits.
pub async fn get_facets(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let catalog = services.catalog();
    let body = dto::FacetsResponse::new(catalog.facets(), catalog.limits());
    (StatusCode::OK, Json(body)).into_response()
}

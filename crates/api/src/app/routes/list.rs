use std::sync::Arc;

use axum::{
    extract::{Extension, RawQuery},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use catalog_filters::{QueryParams, slice_page};

use crate::app::dto;
use crate::app::services::AppServices;

/// `GET /api/list?color=..&tag=..&min=..&max=..&cursor=k`
///
/// Malformed parameters never fail the request: they decode to the
/// unrestricted default, same as the browse view does.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    RawQuery(query): RawQuery,
) -> axum::response::Response {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    let list = slice_page(services.catalog(), &params);

    tracing::debug!(
        query = %params.to_query_string(),
        returned = list.len(),
        "served product page"
    );

    (StatusCode::OK, Json(dto::ListResponse { list })).into_response()
}

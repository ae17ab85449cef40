//! JSON endpoints backing the region selectors.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SigunguQuery {
    pub sido: String,
}

#[derive(Debug, Deserialize)]
pub struct DongQuery {
    pub sido: String,
    pub sigungu: String,
}

/// GET /api/locations/sido
pub async fn api_sido(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.locations.sido_list())
}

/// GET /api/locations/sigungu?sido=
pub async fn api_sigungu(
    State(state): State<AppState>,
    Query(query): Query<SigunguQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.locations.sigungu_list(&query.sido)?))
}

/// GET /api/locations/dong?sido=&sigungu=
pub async fn api_dong(
    State(state): State<AppState>,
    Query(query): Query<DongQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.locations.dong_list(&query.sido, &query.sigungu)?))
}

//! Home page and the category/location selector.

use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::errors::AppError;
use crate::AppState;

/// Top-level site sections and their display names.
pub const CATEGORY_META: [(&str, &str); 3] = [
    ("lifestyle", "동네생활"),
    ("food", "동네맛집"),
    ("repair", "가전수리"),
];

fn category_name(category: &str) -> Option<&'static str> {
    CATEGORY_META
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, name)| *name)
}

/// GET / - home page context.
pub async fn home(jar: SignedCookieJar) -> Json<Value> {
    let categories: Vec<Value> = CATEGORY_META
        .iter()
        .map(|(key, name)| json!({ "key": key, "name": name }))
        .collect();

    Json(json!({
        "user": auth::current_user(&jar),
        "categories": categories,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SelectLocationQuery {
    pub category: String,
}

/// GET /select-location?category= - location selector for one section.
pub async fn select_location(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<SelectLocationQuery>,
) -> Result<Json<Value>, AppError> {
    let name = category_name(&query.category)
        .ok_or_else(|| AppError::NotFound("잘못된 카테고리입니다.".to_string()))?;

    Ok(Json(json!({
        "user": auth::current_user(&jar),
        "category": query.category,
        "category_name": name,
        "sido_list": state.locations.sido_list(),
    })))
}

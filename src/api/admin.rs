//! Administrator endpoints: dashboard and the listing approval queue.

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use serde_json::{json, Value};

use crate::auth;
use crate::errors::AppError;
use crate::AppState;

/// GET /admin - dashboard over users, listings, posts and reviews.
pub async fn admin_home(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<Value>, AppError> {
    let admin = auth::require_admin(&jar)?;
    let users = state.repo.list_users().await?;

    Ok(Json(json!({
        "user": admin,
        "users": users,
        "businesses": state.store.all_businesses(),
        "news_posts": state.store.all_posts(),
        "reviews": state.store.all_reviews(),
    })))
}

/// GET /admin/businesses/pending - listings awaiting approval.
pub async fn pending_businesses(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<Value>, AppError> {
    let admin = auth::require_admin(&jar)?;

    Ok(Json(json!({
        "user": admin,
        "businesses": state.store.pending_businesses(),
    })))
}

/// POST /admin/businesses/{id}/approve
pub async fn approve_business(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    auth::require_admin(&jar)?;

    if state.store.approve_business(id) {
        tracing::info!(business_id = id, "listing approved");
    }

    Ok(Redirect::to("/admin/businesses/pending"))
}

/// POST /admin/businesses/{id}/reject - rejection deletes the listing and
/// its reviews.
pub async fn reject_business(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    auth::require_admin(&jar)?;

    if state.store.delete_business(id) {
        tracing::info!(business_id = id, "listing rejected");
    }

    Ok(Redirect::to("/admin/businesses/pending"))
}

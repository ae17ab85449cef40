//! Community post (동네생활) endpoints.

use axum::extract::{Multipart, Query, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::SignedCookieJar;
use serde_json::{json, Value};

use super::{FormData, RegionQuery};
use crate::auth;
use crate::errors::AppError;
use crate::AppState;

/// GET /lifestyle?sido=&sigungu=&dong= - posts in one neighborhood.
pub async fn lifestyle_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<RegionQuery>,
) -> Result<Json<Value>, AppError> {
    state
        .locations
        .validate(&query.sido, &query.sigungu, &query.dong)?;

    let region = query.into_triple();
    let posts = state.store.posts_in(&region);

    Ok(Json(json!({
        "user": auth::current_user(&jar),
        "sido": region.sido,
        "sigungu": region.sigungu,
        "dong": region.dong,
        "news_posts": posts,
    })))
}

/// GET /lifestyle/new?sido=&sigungu=&dong= - post form context.
pub async fn lifestyle_new_page(
    jar: SignedCookieJar,
    Query(query): Query<RegionQuery>,
) -> Result<Json<Value>, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;

    Ok(Json(json!({
        "user": user,
        "sido": query.sido,
        "sigungu": query.sigungu,
        "dong": query.dong,
    })))
}

/// POST /lifestyle/new - create a post, optionally with an image.
pub async fn lifestyle_new(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;

    let form = FormData::from_multipart(
        multipart,
        &state.config.lifestyle_dir(),
        "/static/lifestyle",
    )
    .await?;

    let title = form.required("title")?;
    let content = form.required("content")?;
    let sido = form.required("sido")?;
    let sigungu = form.required("sigungu")?;
    let dong = form.required("dong")?;

    state.locations.validate(&sido, &sigungu, &dong)?;

    let region = crate::models::RegionTriple {
        sido,
        sigungu,
        dong,
    };
    let image_url = form.image_url.clone();
    state
        .store
        .add_post(&title, &content, &user, region.clone(), image_url);

    Ok(Redirect::to(&format!(
        "/lifestyle?sido={}&sigungu={}&dong={}",
        region.sido, region.sigungu, region.dong
    )))
}

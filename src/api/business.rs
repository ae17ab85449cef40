//! Business listing endpoints: public lists, registration, detail, reviews,
//! edit/delete and the mock entry-fee payment.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use super::FormData;
use crate::auth;
use crate::errors::AppError;
use crate::models::{
    Business, BusinessDraft, BusinessKind, FeatureFlags, MenuItem, OperatingHours, RegionTriple,
    ServiceItem,
};
use crate::store::average_rating;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BusinessListQuery {
    pub sido: String,
    pub sigungu: String,
    pub dong: String,
    pub category: Option<String>,
}

/// GET /food and GET /repair - approved listings in one neighborhood.
pub async fn business_list(
    state: AppState,
    jar: SignedCookieJar,
    kind: BusinessKind,
    query: BusinessListQuery,
) -> Result<Json<Value>, AppError> {
    state
        .locations
        .validate(&query.sido, &query.sigungu, &query.dong)?;

    let region = RegionTriple {
        sido: query.sido,
        sigungu: query.sigungu,
        dong: query.dong,
    };
    let items = state
        .store
        .filter_businesses(kind, &region, query.category.as_deref());
    let categories = state.store.categories(kind);

    Ok(Json(json!({
        "user": auth::current_user(&jar),
        "items": items,
        "categories": categories,
        "sido": region.sido,
        "sigungu": region.sigungu,
        "dong": region.dong,
    })))
}

pub async fn food_list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<BusinessListQuery>,
) -> Result<Json<Value>, AppError> {
    business_list(state, jar, BusinessKind::Food, query).await
}

pub async fn repair_list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<BusinessListQuery>,
) -> Result<Json<Value>, AppError> {
    business_list(state, jar, BusinessKind::Repair, query).await
}

/// GET /business/register - registration form context.
pub async fn business_register_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<Value>, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;

    Ok(Json(json!({
        "user": user,
        "sido_list": state.locations.sido_list(),
    })))
}

/// POST /business/new - register a listing. Admin-created listings are
/// approved immediately; everything else waits for review.
pub async fn business_new(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;

    let form =
        FormData::from_multipart(multipart, &state.config.upload_dir(), "/static/uploads").await?;
    let draft = draft_from_form(&state, &form)?;

    let kind = draft.kind;
    let region = draft.region.clone();
    let approved = auth::session_is_admin(&jar);
    state.store.create_business(&user, approved, draft);

    Ok(Redirect::to(&format!(
        "/{}?sido={}&sigungu={}&dong={}",
        kind.as_str(),
        region.sido,
        region.sigungu,
        region.dong
    )))
}

/// GET /business/{id} - listing detail with reviews and average rating.
pub async fn business_detail(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let business = find_business(&state, id)?;
    let reviews = state.store.reviews_for(id);

    Ok(Json(json!({
        "user": auth::current_user(&jar),
        "business": business,
        "avg_rating": average_rating(&reviews),
        "review_count": reviews.len(),
        "reviews": reviews,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: i32,
    pub comment: String,
}

/// POST /business/{id}/review - leave a review.
pub async fn add_review(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;
    find_business(&state, id)?;

    state.store.add_review(id, &user, form.rating, &form.comment);

    Ok(Redirect::to(&format!("/business/{}", id)))
}

/// GET /my/businesses - the caller's own listings, any approval state.
pub async fn my_businesses(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<Value>, AppError> {
    let user = auth::current_user(&jar).ok_or(AppError::LoginRequired)?;
    let businesses = state.store.businesses_owned_by(&user);

    Ok(Json(json!({
        "user": user,
        "businesses": businesses,
    })))
}

/// GET /business/{id}/edit - edit form context (owner or admin).
pub async fn business_edit_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let business = find_business(&state, id)?;
    require_can_edit(&jar, &business)?;

    Ok(Json(json!({
        "user": auth::current_user(&jar),
        "business": business,
        "sido_list": state.locations.sido_list(),
    })))
}

/// POST /business/{id}/edit - replace the mutable fields; id, approval and
/// paid state survive.
pub async fn business_edit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let business = find_business(&state, id)?;
    require_can_edit(&jar, &business)?;

    let form =
        FormData::from_multipart(multipart, &state.config.upload_dir(), "/static/uploads").await?;
    let draft = draft_from_form(&state, &form)?;

    state
        .store
        .update_business(id, draft)
        .ok_or_else(|| AppError::NotFound("업체 없음".to_string()))?;

    Ok(Redirect::to(&format!("/business/{}", id)))
}

/// POST /business/{id}/delete - remove a listing and its reviews.
pub async fn business_delete(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let business = find_business(&state, id)?;
    require_can_edit(&jar, &business)?;

    state.store.delete_business(id);

    Ok(Redirect::to("/"))
}

/// POST /business/{id}/pay-entry - mock entry-fee payment: flips the paid
/// flag and nothing else.
pub async fn pay_entry(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    auth::current_user(&jar).ok_or(AppError::LoginRequired)?;
    let business = find_business(&state, id)?;
    require_can_edit(&jar, &business)?;

    state.store.mark_paid(id);

    Ok(Redirect::to(&format!("/business/{}", id)))
}

fn find_business(state: &AppState, id: i64) -> Result<Business, AppError> {
    state
        .store
        .business(id)
        .ok_or_else(|| AppError::NotFound("업체 없음".to_string()))
}

fn require_can_edit(jar: &SignedCookieJar, business: &Business) -> Result<(), AppError> {
    if auth::can_edit(jar, &business.owner) {
        Ok(())
    } else if auth::current_user(jar).is_none() {
        Err(AppError::LoginRequired)
    } else {
        Err(AppError::Forbidden("권한 없음".to_string()))
    }
}

/// Build a listing draft from the register/edit form, validating the kind
/// and region triple. Menu and service slots are numbered 1..=3 and kept
/// only when a name was entered.
fn draft_from_form(state: &AppState, form: &FormData) -> Result<BusinessDraft, AppError> {
    let kind_raw = form.required("kind")?;
    let kind = BusinessKind::parse(&kind_raw)
        .ok_or_else(|| AppError::BadRequest("잘못된 업종입니다.".to_string()))?;

    let sido = form.required("sido")?;
    let sigungu = form.required("sigungu")?;
    let dong = form.required("dong")?;
    state.locations.validate(&sido, &sigungu, &dong)?;

    let mut menus = Vec::new();
    for slot in 1..=3 {
        if let Some(name) = form.optional(&format!("menu_name{}", slot)) {
            menus.push(MenuItem {
                name,
                price: form
                    .optional(&format!("menu_price{}", slot))
                    .unwrap_or_default(),
            });
        }
    }

    let mut services = Vec::new();
    for slot in 1..=3 {
        if let Some(name) = form.optional(&format!("service_name{}", slot)) {
            services.push(ServiceItem {
                name,
                description: form
                    .optional(&format!("service_desc{}", slot))
                    .unwrap_or_default(),
                price: form
                    .optional(&format!("service_price{}", slot))
                    .unwrap_or_default(),
            });
        }
    }

    Ok(BusinessDraft {
        kind,
        region: RegionTriple {
            sido,
            sigungu,
            dong,
        },
        category: form.required("category")?,
        name: form.required("name")?,
        description: form.required("description")?,
        phone: form.optional("phone"),
        homepage: form.optional("homepage"),
        blog: form.optional("blog"),
        instagram: form.optional("instagram"),
        address_road: form.optional("address_road"),
        address_detail: form.optional("address_detail"),
        lat: form.optional("lat"),
        lng: form.optional("lng"),
        hours: OperatingHours {
            mon: form.optional("hours_mon"),
            tue: form.optional("hours_tue"),
            wed: form.optional("hours_wed"),
            thu: form.optional("hours_thu"),
            fri: form.optional("hours_fri"),
            sat: form.optional("hours_sat"),
            sun: form.optional("hours_sun"),
            off_day: form.optional("off_day"),
        },
        features: FeatureFlags {
            delivery: form.flag("opt_delivery"),
            reservation: form.flag("opt_reservation"),
            parking: form.flag("opt_parking"),
            pet: form.flag("opt_pet"),
            wifi: form.flag("opt_wifi"),
            group: form.flag("opt_group"),
        },
        menus,
        services,
        image_url: form.image_url.clone(),
    })
}

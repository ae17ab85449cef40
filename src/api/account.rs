//! Local registration/login and Kakao federated login.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::errors::AppError;
use crate::kakao::KakaoProfile;
use crate::models::NewUser;
use crate::AppState;

/// GET /auth/register - registration form context.
pub async fn register_page() -> Json<Value> {
    Json(json!({ "page": "register" }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password2: String,
}

/// POST /auth/register - create a local account and log it in.
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    if form.password != form.password2 {
        return Err(AppError::PasswordMismatch);
    }

    if state
        .repo
        .find_by_username(&form.username)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateUsername);
    }

    let is_admin = form.username == state.config.admin_username;
    let user = state
        .repo
        .create(&NewUser::local(
            &form.username,
            auth::hash_password(&form.password),
            is_admin,
        ))
        .await?;

    tracing::info!(username = %user.username, "user registered");

    let jar = auth::login_session(jar, &user.username, user.is_admin);
    Ok((jar, Redirect::to("/")))
}

/// GET /auth/login - login form context.
pub async fn login_page() -> Json<Value> {
    Json(json!({ "page": "login" }))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - local credential login. The configured bootstrap
/// admin account is created on first login.
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    if form.username == state.config.admin_username
        && form.password == state.config.admin_password
    {
        if state
            .repo
            .find_by_username(&form.username)
            .await?
            .is_none()
        {
            state
                .repo
                .create(&NewUser::local(
                    &form.username,
                    auth::hash_password(&form.password),
                    true,
                ))
                .await?;
        }
        state.repo.touch_last_login(&form.username).await?;

        let jar = auth::login_session(jar, &form.username, true);
        return Ok((jar, Redirect::to("/admin")));
    }

    let user = state
        .repo
        .find_by_username(&form.username)
        .await?
        .ok_or(AppError::LoginFailure)?;

    let valid = user
        .password_hash
        .as_deref()
        .map(|hash| auth::verify_password(&form.password, hash))
        == Some(true);
    if !valid {
        return Err(AppError::LoginFailure);
    }

    state.repo.touch_last_login(&user.username).await?;

    let jar = auth::login_session(jar, &user.username, user.is_admin);
    Ok((jar, Redirect::to("/")))
}

/// GET /auth/logout - drop the session.
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    (auth::clear_session(jar), Redirect::to("/"))
}

// ==================== KAKAO ====================

/// GET /auth/kakao/login - bounce the browser to the consent screen.
pub async fn kakao_login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let kakao = state.kakao.as_ref().ok_or_else(kakao_not_configured)?;
    Ok(Redirect::to(&kakao.authorize_url()))
}

#[derive(Debug, Deserialize)]
pub struct KakaoCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/kakao/callback?code=&error= - complete the OAuth exchange,
/// provisioning a local account on first login. Any prior admin flag on
/// the session is cleared.
pub async fn kakao_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<KakaoCallbackQuery>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    if let Some(error) = query.error {
        return Err(AppError::Federation(format!(
            "카카오 로그인 에러: {}",
            error
        )));
    }
    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("code 파라미터 없음".to_string()))?;

    let kakao = state.kakao.as_ref().ok_or_else(kakao_not_configured)?;
    let profile = kakao.login(&code).await?;

    let user = match state.repo.find_by_kakao_id(&profile.kakao_id).await? {
        Some(user) => {
            state.repo.touch_last_login(&user.username).await?;
            user
        }
        None => provision_kakao_user(&state, &profile).await?,
    };

    let jar = auth::login_session(jar, &user.username, false);
    Ok((jar, Redirect::to("/")))
}

/// First federated login: derive a username from the Kakao id, appending a
/// numeric suffix until it is free.
async fn provision_kakao_user(
    state: &AppState,
    profile: &KakaoProfile,
) -> Result<crate::models::User, AppError> {
    let base_username = format!("kakao_{}", profile.kakao_id);
    let mut username = base_username.clone();

    let mut n = 1;
    while state.repo.find_by_username(&username).await?.is_some() {
        username = format!("{}_{}", base_username, n);
        n += 1;
    }

    let user = state
        .repo
        .create(&NewUser::kakao(
            username,
            profile.email.clone(),
            profile.kakao_id.clone(),
        ))
        .await?;

    tracing::info!(username = %user.username, "kakao account provisioned");
    Ok(user)
}

fn kakao_not_configured() -> AppError {
    AppError::Federation("카카오 로그인이 설정되어 있지 않습니다.".to_string())
}

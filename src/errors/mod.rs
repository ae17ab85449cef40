//! Error handling module.
//!
//! Central error type with mapping to HTTP status codes. User-facing
//! messages are Korean plain text, matching what the site renders; the
//! one exception is `LoginRequired`, which redirects to the login page
//! instead of erroring (gating still happens server-side before any
//! mutation).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Region triple failed directory validation (message names the level)
    InvalidLocation(String),
    /// Username already taken at registration
    DuplicateUsername,
    /// Registration password and confirmation differ
    PasswordMismatch,
    /// Bad username/password on local login
    LoginFailure,
    /// Caller is not an administrator / not the owner
    Forbidden(String),
    /// Admin flag present but no resolvable identity
    Unauthorized(String),
    /// No session on a mutating endpoint; redirect to the login flow
    LoginRequired,
    /// Unknown listing, post or page
    NotFound(String),
    /// Kakao provider error, propagated verbatim
    Federation(String),
    /// Malformed request (missing form field, bad multipart, ...)
    BadRequest(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidLocation(_)
            | AppError::DuplicateUsername
            | AppError::PasswordMismatch
            | AppError::LoginFailure
            | AppError::Federation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::LoginRequired => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message body.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidLocation(msg) => msg.clone(),
            AppError::DuplicateUsername => "이미 존재하는 아이디입니다.".to_string(),
            AppError::PasswordMismatch => "비밀번호가 일치하지 않습니다.".to_string(),
            AppError::LoginFailure => "로그인 실패".to_string(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::LoginRequired => "로그인이 필요합니다.".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Federation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(_) | AppError::Internal(_) => "서버 오류".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Database(msg) | AppError::Internal(msg) => write!(f, "{}", msg),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Unique violations on users surface as duplicate registration
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::DuplicateUsername;
            }
        }
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Provider request failed: {:?}", err);
        AppError::Federation(format!("카카오 요청 실패: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::LoginRequired => Redirect::to("/auth/login").into_response(),
            other => {
                let status = other.status_code();
                if status.is_server_error() {
                    tracing::error!("Request failed: {}", other);
                }
                (status, other.message()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidLocation("잘못된 동".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateUsername.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("권한 없음".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("업체 없음".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            AppError::DuplicateUsername.message(),
            "이미 존재하는 아이디입니다."
        );
        assert_eq!(AppError::LoginFailure.message(), "로그인 실패");
        assert_eq!(
            AppError::PasswordMismatch.message(),
            "비밀번호가 일치하지 않습니다."
        );
    }
}

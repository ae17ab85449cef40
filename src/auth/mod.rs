//! Session and authorization helpers.
//!
//! Sessions are the original two cookies (`user`, `is_admin`) carried in a
//! signed jar, so clients cannot mint an admin flag. Password hashes are
//! SHA-256 hex digests compared in constant time.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Cookie holding the logged-in username.
pub const USER_COOKIE: &str = "user";
/// Cookie holding the administrator flag ("1" when set).
pub const ADMIN_COOKIE: &str = "is_admin";

/// Hash a password for storage.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Check a password against a stored hash in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = hash_password(password);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Username from the session, if any.
pub fn current_user(jar: &SignedCookieJar) -> Option<String> {
    jar.get(USER_COOKIE).map(|c| c.value().to_string())
}

/// Whether the session carries the administrator flag.
pub fn session_is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(ADMIN_COOKIE).map(|c| c.value() == "1") == Some(true)
}

/// Gate for admin routes. An admin flag without a resolvable identity is a
/// broken session and rejected separately.
pub fn require_admin(jar: &SignedCookieJar) -> Result<String, AppError> {
    if !session_is_admin(jar) {
        return Err(AppError::Forbidden("관리자 전용 기능입니다.".to_string()));
    }
    current_user(jar).ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))
}

/// Owner-or-admin check for listing mutation.
pub fn can_edit(jar: &SignedCookieJar, owner: &str) -> bool {
    match current_user(jar) {
        Some(user) => user == owner || session_is_admin(jar),
        None => false,
    }
}

/// Set session cookies after a successful login or registration. A login
/// without the admin flag clears any stale one.
pub fn login_session(jar: SignedCookieJar, username: &str, is_admin: bool) -> SignedCookieJar {
    let jar = jar.add(session_cookie(USER_COOKIE, username));
    if is_admin {
        jar.add(session_cookie(ADMIN_COOKIE, "1"))
    } else {
        jar.remove(removal_cookie(ADMIN_COOKIE))
    }
}

/// Drop both session cookies.
pub fn clear_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal_cookie(USER_COOKIE))
        .remove(removal_cookie(ADMIN_COOKIE))
}

fn session_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

// Removal must carry the same path the cookie was set with
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum_extra::extract::cookie::Key;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::from_headers(&HeaderMap::new(), Key::generate())
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        // sha256("pw1")
        assert_eq!(
            hash_password("pw1"),
            "c592df4a86933b92addc9842402ddf198c638ea9be58916ee6e3734e1e3152f8"
        );
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("secret");
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("other", &hash));
    }

    #[test]
    fn test_session_roundtrip() {
        let jar = login_session(jar(), "alice", false);
        assert_eq!(current_user(&jar).as_deref(), Some("alice"));
        assert!(!session_is_admin(&jar));

        let jar = clear_session(jar);
        assert_eq!(current_user(&jar), None);
    }

    #[test]
    fn test_admin_login_sets_flag_and_plain_login_clears_it() {
        let jar = login_session(jar(), "boss", true);
        assert!(session_is_admin(&jar));
        assert_eq!(require_admin(&jar).unwrap(), "boss");

        let jar = login_session(jar, "alice", false);
        assert!(!session_is_admin(&jar));
    }

    #[test]
    fn test_require_admin_rejections() {
        // No session at all -> Forbidden (flag missing)
        let err = require_admin(&jar()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Flag present but no identity -> Unauthorized
        let broken = jar().add(session_cookie(ADMIN_COOKIE, "1"));
        let err = require_admin(&broken).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_can_edit_owner_or_admin() {
        let owner_jar = login_session(jar(), "alice", false);
        assert!(can_edit(&owner_jar, "alice"));
        assert!(!can_edit(&owner_jar, "bob"));

        let admin_jar = login_session(jar(), "boss", true);
        assert!(can_edit(&admin_jar, "bob"));

        assert!(!can_edit(&jar(), "alice"));
    }
}

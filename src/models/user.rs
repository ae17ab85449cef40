//! User account model backed by the `users` table.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How an account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    /// Local username/password login
    Email,
    /// Kakao federated login
    Kakao,
}

impl LoginType {
    pub fn as_str(self) -> &'static str {
        match self {
            LoginType::Email => "email",
            LoginType::Kakao => "kakao",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(LoginType::Email),
            "kakao" => Some(LoginType::Kakao),
            _ => None,
        }
    }
}

/// A registered user account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub username: String,
    /// Never serialized; kakao accounts have none
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub login_type: LoginType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kakao_id: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Fields for inserting a new account row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Option<String>,
    pub username: String,
    pub password_hash: Option<String>,
    pub login_type: LoginType,
    pub kakao_id: Option<String>,
    pub is_admin: bool,
}

impl NewUser {
    /// Local registration with a pre-hashed password.
    pub fn local(username: &str, password_hash: String, is_admin: bool) -> Self {
        Self {
            email: None,
            username: username.to_string(),
            password_hash: Some(password_hash),
            login_type: LoginType::Email,
            kakao_id: None,
            is_admin,
        }
    }

    /// Account provisioned from a Kakao profile.
    pub fn kakao(username: String, email: Option<String>, kakao_id: String) -> Self {
        Self {
            email,
            username,
            password_hash: None,
            login_type: LoginType::Kakao,
            kakao_id: Some(kakao_id),
            is_admin: false,
        }
    }
}

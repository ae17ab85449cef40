//! User repository over the SQLite pool.
//!
//! Uses prepared statements; uniqueness of username and kakao_id is
//! enforced by the schema and surfaced as `DuplicateUsername`.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{LoginType, NewUser, User};

const USER_COLUMNS: &str = "id, email, username, password_hash, login_type, kakao_id, \
     is_admin, is_active, created_at, last_login";

/// Repository for all user account operations. No delete is exposed.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Find a user by their Kakao identifier.
    pub async fn find_by_kakao_id(&self, kakao_id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE kakao_id = ?",
            USER_COLUMNS
        ))
        .bind(kakao_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Insert a new account. Fails with `DuplicateUsername` when the
    /// username (or kakao_id) is already taken.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (email, username, password_hash, login_type, kakao_id, \
             is_admin, is_active, created_at, last_login) \
             VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.login_type.as_str())
        .bind(&new_user.kakao_id)
        .bind(new_user.is_admin as i32)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            login_type: new_user.login_type,
            kakao_id: new_user.kakao_id.clone(),
            is_admin: new_user.is_admin,
            is_active: true,
            created_at: now,
            last_login: now,
        })
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, username: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE username = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All users, newest first (admin dashboard).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY id DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, AppError> {
    let login_type: String = row.get("login_type");
    let login_type = LoginType::parse(&login_type)
        .ok_or_else(|| AppError::Database(format!("unknown login_type: {}", login_type)))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        login_type,
        kakao_id: row.get("kakao_id"),
        is_admin: row.get::<i32, _>("is_admin") != 0,
        is_active: row.get::<i32, _>("is_active") != 0,
        created_at: parse_timestamp(row, "created_at")?,
        last_login: parse_timestamp(row, "last_login")?,
    })
}

fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, AppError> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("bad {} timestamp: {}", column, e)))
}

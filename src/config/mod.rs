//! Configuration module.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum_extra::extract::cookie::Key;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite user database file
    pub db_path: PathBuf,
    /// Root of the static directory (uploads land under it)
    pub static_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Kakao REST API key (client_id); federation is disabled without it
    pub kakao_client_id: Option<String>,
    /// Redirect URI registered with the Kakao app
    pub kakao_redirect_uri: String,
    /// Secret for signing session cookies
    pub session_secret: Option<String>,
    /// Bootstrap administrator credentials
    pub admin_username: String,
    pub admin_password: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("DATABASE_URL")
            .ok()
            .and_then(|url| url.strip_prefix("sqlite://").map(str::to_string))
            .or_else(|| env::var("DONGNE_DB_PATH").ok())
            .unwrap_or_else(|| "./data/dongne_saenghwal.db".to_string())
            .into();

        let static_dir = env::var("DONGNE_STATIC_DIR")
            .unwrap_or_else(|_| "./static".to_string())
            .into();

        let bind_addr = env::var("DONGNE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .expect("Invalid DONGNE_BIND_ADDR format");

        let kakao_client_id = env::var("KAKAO_CLIENT_ID").ok();

        let kakao_redirect_uri = env::var("KAKAO_REDIRECT_URI")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/auth/kakao/callback".to_string());

        let session_secret = env::var("DONGNE_SESSION_SECRET").ok();

        let admin_username =
            env::var("DONGNE_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("DONGNE_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        let log_level = env::var("DONGNE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            static_dir,
            bind_addr,
            kakao_client_id,
            kakao_redirect_uri,
            session_secret,
            admin_username,
            admin_password,
            log_level,
        }
    }

    /// Cookie signing key. Derived from the configured secret, or generated
    /// fresh when none is set (sessions then reset on restart).
    pub fn cookie_key(&self) -> Key {
        match self.session_secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                // Key::from wants >= 64 bytes of material; stretch the secret
                let mut material = secret.as_bytes().to_vec();
                while material.len() < 64 {
                    let extend = material.clone();
                    material.extend_from_slice(&extend);
                }
                Key::derive_from(&material)
            }
            _ => Key::generate(),
        }
    }

    /// Directory for business listing images.
    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }

    /// Directory for community post images.
    pub fn lifestyle_dir(&self) -> PathBuf {
        self.static_dir.join("lifestyle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // env vars are process-global; keep all from_env checks in one test
    #[test]
    fn test_config_from_env() {
        env::remove_var("DATABASE_URL");
        env::remove_var("DONGNE_DB_PATH");
        env::remove_var("DONGNE_STATIC_DIR");
        env::remove_var("DONGNE_BIND_ADDR");
        env::remove_var("KAKAO_CLIENT_ID");
        env::remove_var("DONGNE_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/dongne_saenghwal.db"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.upload_dir(), PathBuf::from("./static/uploads"));
        assert_eq!(config.lifestyle_dir(), PathBuf::from("./static/lifestyle"));

        env::set_var("DATABASE_URL", "sqlite://./tmp/test.db");
        let config = Config::from_env();
        assert_eq!(config.db_path, PathBuf::from("./tmp/test.db"));
        env::remove_var("DATABASE_URL");
    }

    #[test]
    fn test_cookie_key_from_secret_is_stable() {
        let mut config = Config::from_env();
        config.session_secret = Some("short-secret".to_string());
        let a = config.cookie_key();
        let b = config.cookie_key();
        assert_eq!(a.master(), b.master());
    }
}

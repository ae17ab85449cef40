//! Kakao OAuth federation adapter.
//!
//! Two sequential calls per login: authorization-code exchange against the
//! token endpoint, then a userinfo fetch with the bearer token. Calls have a
//! bounded timeout and one retry on transient transport failure; provider
//! errors are surfaced verbatim as 400s.

use std::time::Duration;

use serde_json::Value;

use crate::errors::AppError;

const AUTH_BASE: &str = "https://kauth.kakao.com";
const API_BASE: &str = "https://kapi.kakao.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Profile fields extracted from the userinfo response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KakaoProfile {
    pub kakao_id: String,
    pub email: Option<String>,
    pub nickname: String,
}

/// Client for the Kakao OAuth endpoints.
pub struct KakaoClient {
    http: reqwest::Client,
    client_id: String,
    redirect_uri: String,
    auth_base: String,
    api_base: String,
}

impl KakaoClient {
    pub fn new(client_id: String, redirect_uri: String) -> Result<Self, AppError> {
        Self::with_endpoints(
            client_id,
            redirect_uri,
            AUTH_BASE.to_string(),
            API_BASE.to_string(),
        )
    }

    /// Construct against non-default endpoints (stub providers in tests).
    pub fn with_endpoints(
        client_id: String,
        redirect_uri: String,
        auth_base: String,
        api_base: String,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            client_id,
            redirect_uri,
            auth_base,
            api_base,
        })
    }

    /// URL the browser is redirected to for consent.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code",
            self.auth_base, self.client_id, self.redirect_uri
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
        ];

        let url = format!("{}/oauth/token", self.auth_base);
        let response = self
            .send_with_retry(|| self.http.post(&url).form(&params))
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Federation(format!("토큰 발급 실패: {}", body)));
        }

        let token_json: Value = response.json().await?;
        token_json
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Federation(format!("토큰 발급 실패: {}", token_json)))
    }

    /// Fetch profile info with the access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<KakaoProfile, AppError> {
        let url = format!("{}/v2/user/me", self.api_base);
        let response = self
            .send_with_retry(|| self.http.get(&url).bearer_auth(access_token))
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Federation(format!("유저 정보 실패: {}", body)));
        }

        let user_json: Value = response.json().await?;
        parse_profile(&user_json)
    }

    /// Full login exchange: code -> token -> profile.
    pub async fn login(&self, code: &str) -> Result<KakaoProfile, AppError> {
        let access_token = self.exchange_code(code).await?;
        self.fetch_profile(&access_token).await
    }

    /// Send a request, retrying once on timeout or connection failure.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, AppError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        match build().send().await {
            Ok(response) => Ok(response),
            Err(err) if err.is_timeout() || err.is_connect() => {
                tracing::warn!("Kakao request failed transiently, retrying: {}", err);
                Ok(build().send().await?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_profile(user_json: &Value) -> Result<KakaoProfile, AppError> {
    // Numeric id in the wild; stringify either way
    let kakao_id = match user_json.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => {
            return Err(AppError::Federation(format!(
                "유저 정보 실패: {}",
                user_json
            )))
        }
    };

    let account = user_json.get("kakao_account").cloned().unwrap_or_default();
    let email = account
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string);
    let nickname = account
        .get("profile")
        .and_then(|p| p.get("nickname"))
        .and_then(Value::as_str)
        .unwrap_or("카카오사용자")
        .to_string();

    Ok(KakaoProfile {
        kakao_id,
        email,
        nickname,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_profile_full() {
        let profile = parse_profile(&json!({
            "id": 123456789,
            "kakao_account": {
                "email": "alice@example.com",
                "profile": { "nickname": "앨리스" }
            }
        }))
        .unwrap();

        assert_eq!(profile.kakao_id, "123456789");
        assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
        assert_eq!(profile.nickname, "앨리스");
    }

    #[test]
    fn test_parse_profile_minimal_defaults() {
        let profile = parse_profile(&json!({ "id": 42 })).unwrap();
        assert_eq!(profile.kakao_id, "42");
        assert_eq!(profile.email, None);
        assert_eq!(profile.nickname, "카카오사용자");
    }

    #[test]
    fn test_parse_profile_missing_id() {
        assert!(parse_profile(&json!({ "kakao_account": {} })).is_err());
    }

    #[test]
    fn test_authorize_url() {
        let client = KakaoClient::with_endpoints(
            "client-key".to_string(),
            "http://localhost/auth/kakao/callback".to_string(),
            "https://kauth.kakao.com".to_string(),
            "https://kapi.kakao.com".to_string(),
        )
        .unwrap();

        assert_eq!(
            client.authorize_url(),
            "https://kauth.kakao.com/oauth/authorize?client_id=client-key\
             &redirect_uri=http://localhost/auth/kakao/callback&response_type=code"
        );
    }
}

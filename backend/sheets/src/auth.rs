//! Google API credentials for the Sheets client.
//!
//! Two modes are supported:
//! - an API key, appended as `key=` (works for sheets shared by link);
//! - a service account, whose RS256-signed assertion is exchanged at the
//!   OAuth token endpoint for a short-lived bearer token.

use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use sheetbot_core::{BotError, BotResult};

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion, in seconds.
const ASSERTION_TTL_SECS: i64 = 3600;
/// Tokens are refreshed this long before Google says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub enum SheetsAuth {
    ApiKey(String),
    ServiceAccount(ServiceAccountAuth),
}

impl SheetsAuth {
    pub fn api_key(key: impl Into<String>) -> Self {
        SheetsAuth::ApiKey(key.into())
    }

    pub fn service_account(
        client_email: impl Into<String>,
        private_key_pem: &str,
        token_url: impl Into<String>,
        http: Client,
    ) -> BotResult<Self> {
        Ok(SheetsAuth::ServiceAccount(ServiceAccountAuth::new(
            client_email,
            private_key_pem,
            token_url,
            http,
        )?))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            SheetsAuth::ApiKey(_) => "api_key",
            SheetsAuth::ServiceAccount(_) => "service_account",
        }
    }

    /// Attach credentials to an outgoing Sheets request.
    pub async fn authorize(&self, request: RequestBuilder) -> BotResult<RequestBuilder> {
        match self {
            SheetsAuth::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            SheetsAuth::ServiceAccount(sa) => {
                let token = sa.access_token().await?;
                Ok(request.bearer_auth(token))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Service account
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_TTL_SECS as u64
}

#[derive(Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

pub struct ServiceAccountAuth {
    client_email: String,
    key: EncodingKey,
    token_url: String,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        client_email: impl Into<String>,
        private_key_pem: &str,
        token_url: impl Into<String>,
        http: Client,
    ) -> BotResult<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| BotError::SheetsAuth(format!("invalid service account key: {e}")))?;
        Ok(Self {
            client_email: client_email.into(),
            key,
            token_url: token_url.into(),
            http,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Current bearer token, fetching a new one when the cached token is
    /// missing or about to expire.
    pub async fn access_token(&self) -> BotResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.token.clone());
            }
            debug!("Cached Google access token is stale");
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.access_token.clone();
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(REFRESH_MARGIN);
        *cached = Some(CachedToken {
            token: fresh.access_token,
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token)
    }

    fn assertion(&self) -> BotResult<String> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SHEETS_READONLY_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| BotError::SheetsAuth(format!("failed to sign assertion: {e}")))
    }

    async fn fetch_token(&self) -> BotResult<TokenResponse> {
        let assertion = self.assertion()?;
        let res = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        if !status.is_success() {
            let reason = match serde_json::from_str::<OAuthError>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{}: {desc}", err.error),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(BotError::SheetsAuth(format!(
                "token endpoint returned {}: {reason}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| BotError::SheetsAuth(format!("unreadable token response: {e}")))?;
        info!(
            client_email = %self.client_email,
            expires_in = token.expires_in,
            "Obtained Google access token"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    const PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_service_account.pem");
    const PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_service_account.pub.pem");
    const EMAIL: &str = "reader@sheetbot-test.iam.gserviceaccount.com";

    fn auth(token_url: String) -> ServiceAccountAuth {
        ServiceAccountAuth::new(EMAIL, PRIVATE_KEY, token_url, Client::new()).unwrap()
    }

    #[test]
    fn rejects_garbage_key() {
        let err = ServiceAccountAuth::new(EMAIL, "not a pem", "http://t", Client::new())
            .err()
            .unwrap();
        assert!(matches!(err, BotError::SheetsAuth(_)));
    }

    #[test]
    fn assertion_carries_readonly_scope() {
        let token_url = "https://oauth2.example.test/token";
        let jwt = auth(token_url.into()).assertion().unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[token_url]);
        let claims = decode::<AssertionClaims>(
            &jwt,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.iss, EMAIL);
        assert_eq!(claims.scope, SHEETS_READONLY_SCOPE);
        assert_eq!(claims.exp - claims.iat, ASSERTION_TTL_SECS);
    }

    #[tokio::test]
    async fn token_is_fetched_once_and_cached() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/token"))
            .and(matchers::body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(matchers::body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.first",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sa = auth(format!("{}/token", server.uri()));
        assert_eq!(sa.access_token().await.unwrap(), "ya29.first");
        assert_eq!(sa.access_token().await.unwrap(), "ya29.first");
    }

    #[tokio::test]
    async fn short_lived_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.brief",
                "expires_in": 30
            })))
            .expect(2)
            .mount(&server)
            .await;

        // Lifetime under the refresh margin, so every call goes back to the endpoint.
        let sa = auth(server.uri());
        sa.access_token().await.unwrap();
        sa.access_token().await.unwrap();
    }

    #[tokio::test]
    async fn oauth_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        let err = auth(server.uri()).access_token().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "sheets authentication failed: token endpoint returned 400: invalid_grant: Invalid JWT Signature."
        );
    }

    #[tokio::test]
    async fn api_key_goes_in_query() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::query_param("key", "AIzaTest"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request = SheetsAuth::api_key("AIzaTest")
            .authorize(Client::new().get(server.uri()))
            .await
            .unwrap();
        assert!(request.send().await.unwrap().status().is_success());
    }
}

// src/modules/sheets/auth.rs

use crate::common::env::DEFAULT_TOKEN_URI;
use crate::common::log;
use crate::modules::whitelist::store::StoreError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub enum Credentials {
    AccessToken(String),
    ServiceAccount { email: String, private_key: String },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

pub struct TokenSource {
    http: reqwest::Client,
    credentials: Credentials,
    token_uri: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            http,
            credentials,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            cached: Mutex::new(None),
        }
    }

    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    pub async fn bearer(&self) -> Result<String, StoreError> {
        let (email, private_key) = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount { email, private_key } => (email, private_key),
        };

        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = sign_assertion(email, private_key, &self.token_uri, now)?;
        let resp = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("token endpoint returned {}: {}", status, body)));
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Auth(format!("unreadable token response: {}", e)))?;

        log::debug(&format!("▪ Sheets token refreshed, valid {}s", token.expires_in));
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }
}

fn sign_assertion(email: &str, private_key: &str, aud: &str, now: i64) -> Result<String, StoreError> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| StoreError::Auth(format!("invalid service account key: {}", e)))?;
    let claims = AssertionClaims {
        iss: email,
        scope: SCOPE,
        aud,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| StoreError::Auth(format!("could not sign assertion: {}", e)))
}

use crate::credential::ServiceAccountKey;
use crate::error::FirebaseError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Refresh this far before the token actually expires, so an upload never
/// starts with a token about to lapse mid-request.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Exchanges a signed JWT assertion for an OAuth2 access token and caches
/// it until shortly before expiry. The capture loop runs for weeks, so a
/// single static token (1h lifetime) would not do.
pub(crate) struct TokenProvider {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    cached: Option<CachedToken>,
}

impl TokenProvider {
    pub fn new(key: &ServiceAccountKey) -> Result<Self, FirebaseError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            signing_key,
            cached: None,
        })
    }

    pub fn access_token(&mut self, http: &Client) -> Result<String, FirebaseError> {
        if let Some(cached) = &self.cached
            && cached.is_fresh(Instant::now())
        {
            return Ok(cached.value.clone());
        }

        let assertion = self.sign_assertion()?;
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()?;
        if !response.status().is_success() {
            return Err(FirebaseError::unexpected(response));
        }

        let token: TokenResponse = response.json()?;
        tracing::debug!(expires_in = token.expires_in, "Access token refreshed");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        let value = token.access_token.clone();
        self.cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    fn sign_assertion(&self) -> Result<String, FirebaseError> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: TOKEN_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_token_fresh_before_expiry() {
        let now = Instant::now();
        let cached = CachedToken {
            value: "tok".to_string(),
            expires_at: now + Duration::from_secs(10),
        };
        assert!(cached.is_fresh(now));
    }

    #[test]
    fn cached_token_stale_at_expiry() {
        let now = Instant::now();
        let cached = CachedToken {
            value: "tok".to_string(),
            expires_at: now,
        };
        assert!(!cached.is_fresh(now));
    }

    #[test]
    fn assertion_claims_serialize_with_oauth_fields() {
        let claims = AssertionClaims {
            iss: "svc@project.iam.gserviceaccount.com",
            scope: TOKEN_SCOPE,
            aud: "https://oauth2.googleapis.com/token",
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iss"], "svc@project.iam.gserviceaccount.com");
        assert_eq!(json["scope"], TOKEN_SCOPE);
        assert_eq!(json["exp"], 1_700_003_600);
    }

    #[test]
    fn token_response_parses() {
        let body = r#"{"access_token": "ya29.abc", "expires_in": 3599, "token_type": "Bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "ya29.abc");
        assert_eq!(token.expires_in, 3599);
    }
}

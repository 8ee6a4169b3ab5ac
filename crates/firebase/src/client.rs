use crate::credential::ServiceAccountKey;
use crate::error::FirebaseError;
use crate::token::TokenProvider;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const STORAGE_BASE_URL: &str = "https://storage.googleapis.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    email: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
}

/// Blocking client for the identity service and the storage bucket.
/// Initialized explicitly once at startup; the handle is passed to
/// whoever needs a lookup or an upload.
pub struct FirebaseClient {
    http: Client,
    tokens: TokenProvider,
    bucket: String,
    lookup_url: String,
    upload_url: String,
}

impl FirebaseClient {
    pub fn connect(key: ServiceAccountKey, bucket: impl Into<String>) -> Result<Self, FirebaseError> {
        let bucket = bucket.into();
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let tokens = TokenProvider::new(&key)?;
        let lookup_url = lookup_endpoint(IDENTITY_BASE_URL, &key.project_id);
        let upload_url = upload_endpoint(STORAGE_BASE_URL, &bucket);

        tracing::info!(project = %key.project_id, %bucket, "Storage backend initialized");

        Ok(Self {
            http,
            tokens,
            bucket,
            lookup_url,
            upload_url,
        })
    }

    /// One identity-service round trip. `Ok(None)` means no account
    /// exists for that email.
    pub fn lookup_uid(&mut self, email: &str) -> Result<Option<String>, FirebaseError> {
        let token = self.tokens.access_token(&self.http)?;
        let response = self
            .http
            .post(&self.lookup_url)
            .bearer_auth(token)
            .json(&LookupRequest { email: [email] })
            .send()?;
        if !response.status().is_success() {
            return Err(FirebaseError::unexpected(response));
        }

        let body: LookupResponse = response.json()?;
        Ok(body.users.into_iter().next().map(|u| u.local_id))
    }

    /// Upload one object to the bucket under the given key. No retry;
    /// the caller decides what a failure means.
    pub fn upload_object(
        &mut self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FirebaseError> {
        let token = self.tokens.access_token(&self.http)?;
        let size = bytes.len();
        let response = self
            .http
            .post(&self.upload_url)
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()?;
        if !response.status().is_success() {
            return Err(FirebaseError::unexpected(response));
        }

        tracing::debug!(%key, bucket = %self.bucket, size, "Object uploaded");
        Ok(())
    }
}

/// Storage key for one uploaded artifact, namespaced per user.
pub fn object_key(uid: &str, filename: &str) -> String {
    format!("images/{uid}/{filename}")
}

fn lookup_endpoint(base: &str, project_id: &str) -> String {
    format!("{base}/v1/projects/{project_id}/accounts:lookup")
}

fn upload_endpoint(base: &str, bucket: &str) -> String {
    format!("{base}/upload/storage/v1/b/{bucket}/o")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_is_namespaced_by_uid() {
        assert_eq!(
            object_key("abc123", "2024-06-15_12-00-00.jpg"),
            "images/abc123/2024-06-15_12-00-00.jpg"
        );
    }

    #[test]
    fn lookup_endpoint_targets_project() {
        assert_eq!(
            lookup_endpoint(IDENTITY_BASE_URL, "espcam-test"),
            "https://identitytoolkit.googleapis.com/v1/projects/espcam-test/accounts:lookup"
        );
    }

    #[test]
    fn upload_endpoint_targets_bucket() {
        assert_eq!(
            upload_endpoint(STORAGE_BASE_URL, "espcam-test.appspot.com"),
            "https://storage.googleapis.com/upload/storage/v1/b/espcam-test.appspot.com/o"
        );
    }

    #[test]
    fn lookup_response_with_match() {
        let body = r#"{"kind": "identitytoolkit#GetAccountInfoResponse",
                       "users": [{"localId": "abc123", "email": "farm@example.com"}]}"#;
        let parsed: LookupResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.users[0].local_id, "abc123");
    }

    #[test]
    fn lookup_response_without_users_field() {
        let body = r#"{"kind": "identitytoolkit#GetAccountInfoResponse"}"#;
        let parsed: LookupResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.users.is_empty());
    }

    #[test]
    fn lookup_request_shape() {
        let json = serde_json::to_value(LookupRequest {
            email: ["farm@example.com"],
        })
        .unwrap();
        assert_eq!(json["email"][0], "farm@example.com");
    }
}

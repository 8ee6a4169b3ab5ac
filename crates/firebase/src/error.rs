use reqwest::StatusCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirebaseError {
    #[error("failed to read service account key at {path}: {source}")]
    Credential {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),

    #[error("failed to sign token assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

impl FirebaseError {
    pub(crate) fn unexpected(response: reqwest::blocking::Response) -> Self {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        FirebaseError::UnexpectedStatus { status, body }
    }
}

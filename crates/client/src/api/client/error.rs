use common::prelude::{AuthorizationDenied, CredentialError};
use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    AuthorizationDenied(#[from] AuthorizationDenied),
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Failures surfaced by the network or the server, as opposed to ones
    ///  raised locally before a request was sent.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Reqwest(_) | ApiError::HttpStatus(..) | ApiError::Json(_)
        )
    }

    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, ApiError::AuthorizationDenied(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus(status, _) => Some(*status),
            ApiError::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}

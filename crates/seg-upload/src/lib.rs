//! Timesheet upload for the segment tracker.
//!
//! Publishes the Turtle export of a tracker to a data.world-style upload
//! endpoint with an HTTP `PUT`. The bearer token is supplied by the caller
//! (configuration or environment) and never appears in `Debug` output.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for uploads.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Upload API root; files land at `{endpoint}/{owner}/{dataset}/files/{file_name}`.
pub const DEFAULT_ENDPOINT: &str = "https://api.data.world/v0/uploads";
pub const DEFAULT_FILE_NAME: &str = "timesheet.ttl";
const TURTLE_CONTENT_TYPE: &str = "text/turtle";

/// Upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The provided token was invalid.
    #[error("invalid upload token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The upload destination is incomplete or malformed.
    #[error("invalid upload target: {reason}")]
    InvalidTarget { reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server rejected the upload.
    #[error("upload rejected with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Where an export is uploaded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadTarget {
    pub endpoint: String,
    pub owner: String,
    pub dataset: String,
    pub file_name: String,
}

impl Default for UploadTarget {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            owner: String::new(),
            dataset: String::new(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl UploadTarget {
    /// Builds the file URL, percent-encoding each path segment.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidTarget`] if a component is blank or the
    /// endpoint is not an absolute URL.
    pub fn url(&self) -> Result<Url, UploadError> {
        for (field, value) in [
            ("owner", &self.owner),
            ("dataset", &self.dataset),
            ("file_name", &self.file_name),
        ] {
            if value.trim().is_empty() {
                return Err(UploadError::InvalidTarget {
                    reason: format!("{field} is not set"),
                });
            }
        }

        let mut url = Url::parse(&self.endpoint).map_err(|err| UploadError::InvalidTarget {
            reason: format!("endpoint {:?}: {err}", self.endpoint),
        })?;
        url.path_segments_mut()
            .map_err(|()| UploadError::InvalidTarget {
                reason: format!("endpoint {:?} cannot take a path", self.endpoint),
            })?
            .pop_if_empty()
            .extend([
                self.owner.as_str(),
                self.dataset.as_str(),
                "files",
                self.file_name.as_str(),
            ]);
        Ok(url)
    }
}

/// Upload API client.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct Uploader {
    http: reqwest::Client,
    token: String,
}

impl fmt::Debug for Uploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uploader")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Uploader {
    /// Creates a new client with the given bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(token: impl Into<String>) -> Result<Self, UploadError> {
        let token = token.into();

        if token.is_empty() {
            return Err(UploadError::InvalidToken {
                reason: "token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(UploadError::InvalidToken {
                reason: "token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(UploadError::ClientBuild)?;

        Ok(Self { http, token })
    }

    /// Uploads `body` as the target file, replacing any previous version.
    pub async fn upload(&self, target: &UploadTarget, body: String) -> Result<(), UploadError> {
        let url = target.url()?;
        tracing::debug!(%url, bytes = body.len(), "uploading export");

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, TURTLE_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                message: parse_api_message(&text).unwrap_or(text),
            });
        }

        tracing::info!(file = %target.file_name, "upload complete");
        Ok(())
    }
}

fn parse_api_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> UploadTarget {
        UploadTarget {
            owner: "acme".to_string(),
            dataset: "timesheets".to_string(),
            ..UploadTarget::default()
        }
    }

    #[test]
    fn uploader_rejects_empty_token() {
        assert!(matches!(
            Uploader::new(""),
            Err(UploadError::InvalidToken { .. })
        ));
    }

    #[test]
    fn uploader_rejects_whitespace_token() {
        assert!(matches!(
            Uploader::new("  \t"),
            Err(UploadError::InvalidToken { .. })
        ));
    }

    #[test]
    fn uploader_accepts_valid_token() {
        assert!(Uploader::new("dw-token").is_ok());
    }

    #[test]
    fn uploader_debug_redacts_token() {
        let uploader = Uploader::new("secret-token").unwrap();
        let debug = format!("{uploader:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn target_url_joins_segments() {
        assert_eq!(
            target().url().unwrap().as_str(),
            "https://api.data.world/v0/uploads/acme/timesheets/files/timesheet.ttl"
        );
    }

    #[test]
    fn target_url_tolerates_trailing_slash_and_encodes() {
        let target = UploadTarget {
            endpoint: "http://localhost:8080/uploads/".to_string(),
            file_name: "week 5.ttl".to_string(),
            ..target()
        };
        assert_eq!(
            target.url().unwrap().as_str(),
            "http://localhost:8080/uploads/acme/timesheets/files/week%205.ttl"
        );
    }

    #[test]
    fn target_url_requires_owner_and_dataset() {
        let err = UploadTarget::default().url().unwrap_err();
        assert!(matches!(err, UploadError::InvalidTarget { .. }));
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn target_url_rejects_relative_endpoint() {
        let target = UploadTarget {
            endpoint: "uploads".to_string(),
            ..target()
        };
        assert!(matches!(
            target.url(),
            Err(UploadError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn parse_api_message_extracts_message() {
        assert_eq!(
            parse_api_message(r#"{"code":401,"message":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(parse_api_message("<html>"), None);
    }

    #[tokio::test]
    async fn upload_fails_before_sending_on_bad_target() {
        let uploader = Uploader::new("dw-token").unwrap();
        let result = uploader
            .upload(&UploadTarget::default(), "prefix ts: <x>\n".to_string())
            .await;
        assert!(matches!(result, Err(UploadError::InvalidTarget { .. })));
    }
}

//! Analysis Client
//!
//! One multipart POST per submission: the image as the `image` file part and
//! the name as the `username` text part. No retries, no streaming.

pub mod types;

pub use types::{Analysis, AnalysisResult, ErrorBody, Recommendation};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::error::ErrorCode;
use crate::media::ImageBlob;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to reach analysis service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis service error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("failed to parse analysis response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AnalysisError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::Transport,
            Self::Server { .. } => ErrorCode::Server,
            Self::Decode(_) => ErrorCode::Decode,
            Self::InvalidRequest(_) => ErrorCode::Validation,
        }
    }

    /// Message for the capture panel: the service's own `error` text when it
    /// sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Something that turns an image and a name into a prescription
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &ImageBlob,
        username: &str,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// HTTP implementation against the analyze endpoint
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(
        &self,
        image: &ImageBlob,
        username: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let image_part = reqwest::multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime())
            .map_err(|e| AnalysisError::InvalidRequest(format!("bad mime type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("image", image_part)
            .text("username", username.to_string());

        tracing::info!(
            "Submitting {} ({} bytes) to {}",
            image.file_name(),
            image.len(),
            self.endpoint
        );

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            tracing::warn!("Analysis failed ({}): {:?}", status, message);
            return Err(AnalysisError::Server { status, message });
        }

        let result: AnalysisResult = serde_json::from_slice(&body)
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;

        tracing::info!(
            "Analysis complete: emotion={:?}, title={:?}",
            result.analysis.detected_emotion,
            result.recommendation.title
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SUCCESS_BODY: &str = r#"{
        "analysis": {"detected_emotion": "joy", "reason": "wide smile"},
        "recommendation": {"title": "Sample Book", "author": "A. Writer", "genre": "소설", "content": "Once upon a time"}
    }"#;

    fn jpeg() -> ImageBlob {
        ImageBlob::new("camera-capture.jpg", "image/jpeg", b"fake-jpeg-frame".to_vec())
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="image"; filename="camera-capture.jpg""#.to_string()),
                Matcher::Regex(r#"name="username""#.to_string()),
                Matcher::Regex("홍길동".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SUCCESS_BODY)
            .create_async()
            .await;

        let client = AnalysisClient::new(format!("{}/analyze", server.url()));
        let result = client.analyze(&jpeg(), "홍길동").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.analysis.detected_emotion, "joy");
        assert_eq!(result.recommendation.title, "Sample Book");
    }

    #[tokio::test]
    async fn test_analyze_sends_empty_username() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_body(Matcher::Regex(r#"name="username""#.to_string()))
            .with_status(200)
            .with_body(SUCCESS_BODY)
            .create_async()
            .await;

        let client = AnalysisClient::new(format!("{}/analyze", server.url()));
        assert!(client.analyze(&jpeg(), "").await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_error_body_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid image"}"#)
            .create_async()
            .await;

        let client = AnalysisClient::new(format!("{}/analyze", server.url()));
        let err = client.analyze(&jpeg(), "kim").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.code(), ErrorCode::Server);
        assert_eq!(err.user_message("fallback"), "invalid image");
        assert!(err.to_string().contains("400"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_analyze_error_without_body_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = AnalysisClient::new(format!("{}/analyze", server.url()));
        let err = client.analyze(&jpeg(), "kim").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[tokio::test]
    async fn test_analyze_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze")
            .with_status(200)
            .with_body(r#"{"analysis": "nope"}"#)
            .create_async()
            .await;

        let client = AnalysisClient::new(format!("{}/analyze", server.url()));
        let err = client.analyze(&jpeg(), "kim").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Decode);
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[tokio::test]
    async fn test_analyze_unreachable_endpoint() {
        // Port 9 (discard) is not listening on test machines
        let client = AnalysisClient::new("http://127.0.0.1:9/analyze");
        let err = client.analyze(&jpeg(), "kim").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Transport);
        assert_eq!(err.user_message("fallback"), "fallback");
    }
}

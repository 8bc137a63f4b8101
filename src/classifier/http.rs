use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::Classifier;
use super::types::ComplexityVerdict;
use crate::app::ClassifierSettings;
use crate::constants::{CLASSIFY_PATH, HEALTH_CHECK_TIMEOUT_MS, HEALTH_PATH};
use crate::utils::ClassifierError;

/// Classifier reached over HTTP
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    /// Create a new client from configured settings
    pub fn new(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.credential(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

/// Map a non-success status to the error taxonomy
fn status_error(status: StatusCode, body: &str) -> ClassifierError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClassifierError::Auth(detail),
        s if s.is_server_error() => ClassifierError::Unavailable(detail),
        _ => ClassifierError::BadResponse(detail),
    }
}

/// Decode and validate a response body
fn decode_verdict(body: &str) -> Result<ComplexityVerdict, ClassifierError> {
    let verdict: ComplexityVerdict =
        serde_json::from_str(body).map_err(|e| ClassifierError::BadResponse(e.to_string()))?;

    if !verdict.is_well_formed() {
        return Err(ClassifierError::BadResponse(format!(
            "confidence {} outside [0, 1] or invalid processing time",
            verdict.confidence
        )));
    }

    Ok(verdict)
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, code: &str) -> Result<ComplexityVerdict, ClassifierError> {
        let url = format!("{}{}", self.endpoint, CLASSIFY_PATH);
        debug!("classifying {} bytes via {}", code.len(), url);

        let response = self
            .authorize(self.client.post(&url).json(&json!({ "code": code })))
            .send()
            .await
            .map_err(|e| {
                ClassifierError::Unavailable(format!("{} ({})", self.endpoint, e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassifierError::BadResponse(e.to_string()))?;

        if !status.is_success() {
            warn!("classifier responded with {}", status);
            return Err(status_error(status, &body));
        }

        decode_verdict(&body)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}{}", self.endpoint, HEALTH_PATH);
        let request = self
            .authorize(self.client.get(&url))
            .timeout(Duration::from_millis(HEALTH_CHECK_TIMEOUT_MS));

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Complexity;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            ClassifierError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "nope"),
            ClassifierError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            ClassifierError::Unavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            ClassifierError::BadResponse(_)
        ));
    }

    #[test]
    fn test_decode_verdict() {
        let verdict = decode_verdict(r#"{"complexity":"moderate","confidence":0.6}"#).unwrap();
        assert_eq!(verdict.complexity, Complexity::Moderate);

        assert!(matches!(
            decode_verdict("<html>gateway</html>"),
            Err(ClassifierError::BadResponse(_))
        ));
        assert!(matches!(
            decode_verdict(r#"{"complexity":"simple","confidence":7}"#),
            Err(ClassifierError::BadResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let settings = ClassifierSettings {
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key: None,
            timeout_secs: 2,
        };
        let classifier = HttpClassifier::new(&settings).unwrap();

        assert!(!classifier.health_check().await);
        assert!(matches!(
            classifier.classify("function f() {}").await,
            Err(ClassifierError::Unavailable(_))
        ));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let settings = ClassifierSettings {
            endpoint: "http://localhost:8000/".to_string(),
            api_key: Some(String::new()),
            timeout_secs: 5,
        };
        let classifier = HttpClassifier::new(&settings).unwrap();
        assert_eq!(classifier.endpoint(), "http://localhost:8000");
        assert!(classifier.api_key.is_none());
    }
}

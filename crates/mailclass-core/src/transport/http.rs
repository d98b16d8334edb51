//! reqwest-backed transport for the classification backend.

use std::error::Error as _;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{ClassifyTransport, TransportFuture};
use crate::{
    ClassificationOptions, ClassificationResult, ClassifyError, ClientConfig, ConfigError,
    SelectedFile,
};

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Talks to `{base_url}/classify` and `{base_url}/health`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    async fn post_classify(
        &self,
        file: &SelectedFile,
        options: &ClassificationOptions,
    ) -> Result<ClassificationResult, ClassifyError> {
        let bytes = file.read_bytes().await?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.mime_type())
            .map_err(|e| ClassifyError::network(format!("Failed to create file part: {}", e)))?;
        let form = Form::new().part("file", part);

        let url = self.config.classify_url();
        tracing::info!(
            url = %url,
            file = %file.name,
            size = file.size_bytes,
            stemming = options.stemming_enabled,
            provider = %options.provider,
            "sending classification request"
        );

        let response = self
            .client
            .post(&url)
            .query(&options.query_pairs())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "classification request failed");
                transport_error(&e)
            })?;

        read_classification(response).await
    }

    async fn get_health(&self) -> Result<String, ClassifyError> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ClassifyError::server_rejected(status.as_u16(), &body));
        }
        serde_json::from_str::<HealthResponse>(&body)
            .map(|h| h.status)
            .map_err(|e| ClassifyError::network(format!("Invalid health response: {}", e)))
    }
}

impl ClassifyTransport for HttpTransport {
    fn classify<'a>(
        &'a self,
        file: &'a SelectedFile,
        options: &'a ClassificationOptions,
    ) -> TransportFuture<'a, ClassificationResult> {
        Box::pin(self.post_classify(file, options))
    }

    fn health(&self) -> TransportFuture<'_, String> {
        Box::pin(self.get_health())
    }
}

/// Map a backend response to a result or a [`ClassifyError`].
///
/// Non-2xx: the body text becomes the message verbatim (or a generic message
/// naming the status when the body is empty). 2xx with a body that is not a
/// valid result is reported as a network-class failure.
pub async fn read_classification(
    response: reqwest::Response,
) -> Result<ClassificationResult, ClassifyError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body_len = body.len(), "backend rejected document");
        return Err(ClassifyError::server_rejected(status.as_u16(), &body));
    }

    let body = response.text().await.map_err(|e| transport_error(&e))?;
    let result: ClassificationResult = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "unparsable classification response");
        ClassifyError::network(format!("Resposta inválida do servidor: {}", e))
    })?;

    tracing::debug!(
        category = %result.category,
        confidence = result.confidence,
        "classification received"
    );
    Ok(result)
}

/// Flatten a reqwest error and its sources into one message.
fn transport_error(err: &reqwest::Error) -> ClassifyError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    ClassifyError::network(message)
}

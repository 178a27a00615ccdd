// ────────────────────────────────
// src/proxy/translator.rs
// Forwards one form submission to the remote translation service
// ────────────────────────────────

use super::error::{truncate_chars, TranslateError};
use super::types::{TranslationOutcome, TranslationRequest};
use crate::config::BackendConfig;
use crate::metrics::{MetricsCollector, Timer};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_TRANSLATION: &str = "No translation received";

const LOG_BODY_CHARS: usize = 500;

pub struct TranslationProxy {
    client: Client,
    url: String,
    tunnel_header: (String, String),
    metrics: Option<Arc<MetricsCollector>>,
}

impl TranslationProxy {
    pub fn new(config: &BackendConfig, metrics: Option<Arc<MetricsCollector>>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.translate_timeout())
            .build()
            .context("Failed to create translation HTTP client")?;

        Ok(Self {
            client,
            url: config.translate_url(),
            tunnel_header: (
                config.tunnel_header.name.clone(),
                config.tunnel_header.value.clone(),
            ),
            metrics,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Blank input short-circuits without touching the network.
    pub async fn translate(&self, raw: &str) -> TranslationOutcome {
        let outcome: TranslationOutcome = match TranslationRequest::parse(raw) {
            Ok(request) => self.forward(&request).await.into(),
            Err(err) => TranslationOutcome::Failure(err),
        };

        match &outcome {
            TranslationOutcome::Success(text) => debug!(translation = %text, "translation succeeded"),
            TranslationOutcome::Failure(err) => {
                warn!(kind = %err.kind(), error = %err, "translation failed")
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_translation(outcome.label());
        }

        outcome
    }

    async fn forward(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        let timer = Timer::new();
        let (name, value) = &self.tunnel_header;

        info!(url = %self.url, payload = ?request, "forwarding translation request");

        let result = self.exchange(request, name, value).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_upstream("translate", timer.elapsed());
        }

        let (status, body) = result?;
        if status != StatusCode::OK {
            return Err(TranslateError::http(status.as_u16(), &body));
        }

        parse_translation(&body)
    }

    async fn exchange(
        &self,
        request: &TranslationRequest,
        name: &str,
        value: &str,
    ) -> Result<(StatusCode, String), TranslateError> {
        let timer = Timer::new();

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(name, value)
            .json(request)
            .send()
            .await
            .map_err(TranslateError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(TranslateError::from_transport)?;

        info!(
            %status,
            elapsed = ?timer.elapsed(),
            body = truncate_chars(&body, LOG_BODY_CHARS),
            "remote responded"
        );

        Ok((status, body))
    }
}

/// Extracts `translation` from a 200 response body.
///
/// A JSON object without the key (or with `null`) is a degenerate success
/// carrying [`NO_TRANSLATION`]; non-string values are shown as JSON text.
pub fn parse_translation(body: &str) -> Result<String, TranslateError> {
    let value: Value = serde_json::from_str(body).map_err(|_| TranslateError::decode(body))?;

    let object = value.as_object().ok_or_else(|| {
        TranslateError::Unknown(format!(
            "unexpected response from server, expected a JSON object: {}",
            truncate_chars(body, super::error::BODY_EXCERPT_CHARS)
        ))
    })?;

    Ok(match object.get("translation") {
        None | Some(Value::Null) => NO_TRANSLATION.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    })
}

// src/health/checker.rs
use super::HealthStatus;
use crate::config::BackendConfig;
use crate::metrics::{MetricsCollector, Timer};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Checks the remote service's health endpoint once per page load.
pub struct HealthChecker {
    client: Client,
    url: String,
    tunnel_header: (String, String),
    metrics: Option<Arc<MetricsCollector>>,
}

impl HealthChecker {
    pub fn new(config: &BackendConfig, metrics: Option<Arc<MetricsCollector>>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.health_timeout())
            .build()
            .context("Failed to create health check HTTP client")?;

        Ok(Self {
            client,
            url: config.health_url(),
            tunnel_header: (
                config.tunnel_header.name.clone(),
                config.tunnel_header.value.clone(),
            ),
            metrics,
        })
    }

    /// Never fails: transport errors become [`HealthStatus::Unreachable`].
    pub async fn check(&self) -> HealthStatus {
        let timer = Timer::new();
        let (name, value) = &self.tunnel_header;

        let result = self
            .client
            .get(&self.url)
            .header(name.as_str(), value.as_str())
            .send()
            .await;

        let status = match result {
            Ok(response) if response.status() == StatusCode::OK => HealthStatus::Connected,
            Ok(response) => {
                warn!(url = %self.url, status = %response.status(), "health check returned non-200");
                HealthStatus::BadStatus(response.status())
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "health check failed");
                HealthStatus::Unreachable
            }
        };

        let elapsed = timer.elapsed();
        debug!(url = %self.url, ?elapsed, result = status.label(), "health check complete");

        if let Some(metrics) = &self.metrics {
            metrics.record_health_check(status.label());
            metrics.record_upstream("health", elapsed);
        }

        status
    }
}

// src/health/status.rs
use reqwest::StatusCode;

/// Result of a single check against the remote `/health` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Connected,
    BadStatus(StatusCode),
    Unreachable,
}

impl HealthStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, HealthStatus::Connected)
    }

    pub fn message(&self) -> String {
        match self {
            HealthStatus::Connected => "Connected to server".to_string(),
            HealthStatus::BadStatus(status) => {
                format!("Server returned status {}", status.as_u16())
            }
            HealthStatus::Unreachable => {
                "Cannot connect to server - check the remote URL".to_string()
            }
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Connected => "connected",
            HealthStatus::BadStatus(_) => "bad_status",
            HealthStatus::Unreachable => "unreachable",
        }
    }
}

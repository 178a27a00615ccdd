// src/config/models.rs
use anyhow::{bail, Result};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "https://19699838395f.ngrok-free.app";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: SocketAddr,
    pub backend: BackendConfig,
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 5000)),
            backend: BackendConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.backend.validate()?;

        if !self.metrics.path.starts_with('/') {
            bail!("metrics.path must start with '/', got {:?}", self.metrics.path);
        }
        if self.metrics.enabled && self.metrics.port == self.listen.port() {
            bail!(
                "metrics.port {} collides with the listen port",
                self.metrics.port
            );
        }

        Ok(())
    }
}

/// Where the remote translation service lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Url,
    pub health_path: String,
    pub translate_path: String,
    pub health_timeout_ms: u64,
    pub translate_timeout_ms: u64,
    pub tunnel_header: TunnelHeader,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            health_path: "/health".to_string(),
            translate_path: "/translate".to_string(),
            health_timeout_ms: 5_000,
            translate_timeout_ms: 60_000,
            tunnel_header: TunnelHeader::default(),
        }
    }
}

impl BackendConfig {
    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_millis(self.translate_timeout_ms)
    }

    /// Base URL with every trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url(), self.health_path)
    }

    pub fn translate_url(&self) -> String {
        format!("{}{}", self.base_url(), self.translate_path)
    }

    fn validate(&self) -> Result<()> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => bail!("backend.url must be http or https, got scheme {:?}", other),
        }
        if self.health_timeout_ms == 0 || self.translate_timeout_ms == 0 {
            bail!("backend timeouts must be greater than zero");
        }
        for path in [&self.health_path, &self.translate_path] {
            if !path.starts_with('/') {
                bail!("backend paths must start with '/', got {:?}", path);
            }
        }
        self.tunnel_header.validate()
    }
}

/// Header that tells the tunnel provider to skip its interstitial page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelHeader {
    pub name: String,
    pub value: String,
}

impl TunnelHeader {
    /// Both halves must be legal HTTP, or every outbound call fails to build.
    fn validate(&self) -> Result<()> {
        if let Err(e) = HeaderName::from_bytes(self.name.as_bytes()) {
            bail!("backend.tunnel_header.name {:?} is not a valid header name: {}", self.name, e);
        }
        if let Err(e) = HeaderValue::from_str(&self.value) {
            bail!("backend.tunnel_header.value {:?} is not a valid header value: {}", self.value, e);
        }
        Ok(())
    }
}

impl Default for TunnelHeader {
    fn default() -> Self {
        Self {
            name: "ngrok-skip-browser-warning".to_string(),
            value: "true".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen.to_string(), "127.0.0.1:5000");
        assert_eq!(config.backend.health_timeout(), Duration::from_secs(5));
        assert_eq!(config.backend.translate_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_endpoint_urls_strip_trailing_slashes() {
        let mut backend = BackendConfig::default();
        backend.url = Url::parse("http://example.test/api//").unwrap();

        assert_eq!(backend.translate_url(), "http://example.test/api/translate");
        assert_eq!(backend.health_url(), "http://example.test/api/health");
    }

    #[test]
    fn test_bare_host_url_gets_single_slash() {
        let mut backend = BackendConfig::default();
        backend.url = Url::parse("https://abc.ngrok-free.app").unwrap();

        assert_eq!(backend.translate_url(), "https://abc.ngrok-free.app/translate");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.backend.url = Url::parse("ftp://example.test").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.backend.translate_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_tunnel_header() {
        let mut config = Config::default();
        config.backend.tunnel_header.name = "ngrok skip".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backend.tunnel_header.name = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backend.tunnel_header.value = "true\r\nx-injected: 1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_custom_tunnel_header() {
        let mut config = Config::default();
        config.backend.tunnel_header = TunnelHeader {
            name: "bypass-tunnel-reminder".to_string(),
            value: "1".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_metrics_port_collision() {
        let mut config = Config::default();
        config.metrics.enabled = true;
        config.metrics.port = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "backend:\n  url: \"http://localhost:8000\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.backend.translate_url(), "http://localhost:8000/translate");
        assert_eq!(config.backend.tunnel_header.name, "ngrok-skip-browser-warning");
        assert!(!config.metrics.enabled);
    }
}

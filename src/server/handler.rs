// src/server/handler.rs
use hyper::body::HttpBody;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::health::HealthChecker;
use crate::metrics::{MetricsCollector, Timer};
use crate::proxy::TranslationProxy;
use crate::render::render_page;

/// Routes `/` to the health check (GET) or the translation proxy (POST)
/// and renders the page. Every request is independent.
#[derive(Clone)]
pub struct RequestHandler {
    checker: Arc<HealthChecker>,
    proxy: Arc<TranslationProxy>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RequestHandler {
    pub fn new(
        checker: Arc<HealthChecker>,
        proxy: Arc<TranslationProxy>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        Self {
            checker,
            proxy,
            metrics,
        }
    }

    pub fn from_config(
        config: &BackendConfig,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> anyhow::Result<Self> {
        let checker = Arc::new(HealthChecker::new(config, metrics.clone())?);
        let proxy = Arc::new(TranslationProxy::new(config, metrics.clone())?);
        Ok(Self::new(checker, proxy, metrics))
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let timer = Timer::new();
        let method = req.method().clone();

        let response = self.route(req).await;

        let elapsed = timer.elapsed();
        info!(status = %response.status(), ?elapsed, "request complete");
        if let Some(metrics) = &self.metrics {
            metrics.record_request(method.as_str(), response.status().as_u16(), elapsed);
        }

        response
    }

    async fn route(&self, req: Request<Body>) -> Response<Body> {
        if req.uri().path() != "/" {
            return plain(StatusCode::NOT_FOUND, "Not Found");
        }

        let method = req.method().clone();
        match method {
            Method::GET => {
                let status = self.checker.check().await;
                html(render_page(None, Some(&status), None))
            }
            Method::POST => {
                let body = match read_form_body(req, MAX_FORM_BYTES).await {
                    Ok(body) => body,
                    Err(FormBodyError::TooLarge) => {
                        warn!(limit = MAX_FORM_BYTES, "form body too large");
                        return plain(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large");
                    }
                    Err(FormBodyError::Read(err)) => {
                        warn!(%err, "failed to read form body");
                        return plain(StatusCode::BAD_REQUEST, "Failed to read request body");
                    }
                };
                let text = form_field(&body, "text");
                let outcome = self.proxy.translate(&text).await;
                html(render_page(Some(&text), None, Some(&outcome)))
            }
            _ => {
                let mut response = plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET, POST"));
                response
            }
        }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        let span = info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path(),
        );

        Box::pin(async move { Ok::<_, Infallible>(handler.handle(req).await) }.instrument(span))
    }
}

/// Largest form body accepted on `POST /`.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FormBodyError {
    #[error("form body exceeds the size limit")]
    TooLarge,

    #[error("failed to read form body: {0}")]
    Read(#[from] hyper::Error),
}

/// Reads the request body, giving up as soon as it passes `limit` bytes.
/// A declared `Content-Length` over the limit is rejected before reading.
pub async fn read_form_body(req: Request<Body>, limit: usize) -> Result<Vec<u8>, FormBodyError> {
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.map_or(false, |len| len > limit as u64) {
        return Err(FormBodyError::TooLarge);
    }

    let mut body = req.into_body();
    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(FormBodyError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Value of `name` in an urlencoded form body; missing means empty.
pub fn form_field(body: &[u8], name: &str) -> String {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn html(page: askama::Result<String>) -> Response<Body> {
    let page = match page {
        Ok(page) => page,
        Err(err) => {
            error!(%err, "failed to render page");
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let mut response = Response::new(Body::from(page));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

fn plain(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_decodes() {
        assert_eq!(form_field(b"text=namaste+ji%21", "text"), "namaste ji!");
        assert_eq!(form_field(b"other=1&text=%E0%A4%A8", "text"), "न");
    }

    fn post(body: Body, content_length: Option<usize>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/");
        if let Some(len) = content_length {
            builder = builder.header(CONTENT_LENGTH, len);
        }
        builder.body(body).unwrap()
    }

    #[tokio::test]
    async fn test_read_form_body_within_limit() {
        let body = read_form_body(post(Body::from("text=hi"), Some(7)), 16)
            .await
            .unwrap();
        assert_eq!(body, b"text=hi");
    }

    #[tokio::test]
    async fn test_read_form_body_rejects_declared_length() {
        let result = read_form_body(post(Body::empty(), Some(17)), 16).await;
        assert!(matches!(result, Err(FormBodyError::TooLarge)));
    }

    #[tokio::test]
    async fn test_read_form_body_rejects_streamed_overflow() {
        let chunks: Vec<Result<&'static str, std::io::Error>> =
            vec![Ok("text="), Ok("aaaaaaaa"), Ok("aaaaaaaa")];
        let body = Body::wrap_stream(futures::stream::iter(chunks));

        let result = read_form_body(post(body, None), 16).await;
        assert!(matches!(result, Err(FormBodyError::TooLarge)));
    }

    #[test]
    fn test_form_field_missing_is_empty() {
        assert_eq!(form_field(b"", "text"), "");
        assert_eq!(form_field(b"foo=bar", "text"), "");
    }
}

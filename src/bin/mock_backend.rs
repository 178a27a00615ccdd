//! Local stand-in for the remote translation service.
//! Run: cargo run --bin mock_backend -- <port> [name]

use hyper::{
    header::CONTENT_TYPE,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use rand::Rng;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Clone)]
struct MockState {
    name: String,
    req_counter: Arc<AtomicU64>,
    healthy: bool,
    base_delay: u64,
    jitter_ms: u64,
    fail_pct: f64,
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static(content_type));
    response
}

async fn handle(req: Request<Body>, state: MockState) -> Result<Response<Body>, Infallible> {
    let n = state.req_counter.fetch_add(1, Ordering::SeqCst) + 1;

    match (req.method(), req.uri().path()) {
        (&Method::GET, "/health") => {
            if state.healthy {
                Ok(respond(StatusCode::OK, "application/json", r#"{"status":"ok"}"#.into()))
            } else {
                Ok(respond(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "text/plain",
                    "Unhealthy".into(),
                ))
            }
        }
        (&Method::POST, "/translate") => {
            let delay = state.base_delay + rand::thread_rng().gen_range(0..=state.jitter_ms);
            if delay > 0 {
                sleep(Duration::from_millis(delay)).await;
            }

            if state.fail_pct > 0.0 && rand::thread_rng().gen_bool(state.fail_pct / 100.0) {
                warn!(req = n, "injecting failure");
                return Ok(respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain",
                    "Injected failure".into(),
                ));
            }

            let body = match hyper::body::to_bytes(req.into_body()).await {
                Ok(body) => body,
                Err(e) => {
                    return Ok(respond(StatusCode::BAD_REQUEST, "text/plain", e.to_string()));
                }
            };
            let text = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("text").and_then(|t| t.as_str()).map(str::to_owned));

            match text {
                Some(text) => {
                    info!(req = n, delay_ms = delay, %text, "translated");
                    let payload = serde_json::json!({
                        "translation": format!("[{}] {}", state.name, text),
                    });
                    Ok(respond(StatusCode::OK, "application/json", payload.to_string()))
                }
                None => Ok(respond(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "application/json",
                    r#"{"error":"missing text"}"#.into(),
                )),
            }
        }
        _ => Ok(respond(StatusCode::NOT_FOUND, "text/plain", "Not Found".into())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port: u16 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "8000".into())
        .parse()?;
    let name = std::env::args()
        .nth(2)
        .or_else(|| std::env::var("MOCK_NAME").ok())
        .unwrap_or_else(|| format!("mock-{port}"));

    let env_num = |key: &str| std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok());
    let state = MockState {
        name: name.clone(),
        req_counter: Arc::new(AtomicU64::new(0)),
        healthy: std::env::var("MOCK_UNHEALTHY").is_err(),
        base_delay: env_num("BASE_DELAY_MS").unwrap_or(0),
        jitter_ms: env_num("JITTER_MS").unwrap_or(0),
        fail_pct: std::env::var("FAIL_PCT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0_f64)
            .clamp(0.0, 100.0),
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let make_svc = make_service_fn(move |_conn| {
        let st = state.clone();
        async move { Ok::<_, Infallible>(service_fn(move |req| handle(req, st.clone()))) }
    });

    info!("Mock translation backend '{}' on http://{}", name, addr);

    Server::try_bind(&addr)?.serve(make_svc).await?;
    Ok(())
}

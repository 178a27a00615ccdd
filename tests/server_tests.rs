// tests/server_tests.rs
mod common;

use std::time::Duration;

use romanized_translator::server::{RequestHandler, ServerBuilder};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use common::backend_config;

#[tokio::test]
async fn test_serves_page_then_stops_on_shutdown() {
    let mut backend = mockito::Server::new_async().await;
    backend.mock("GET", "/health").with_status(200).create_async().await;

    let handler = RequestHandler::from_config(&backend_config(&backend.url()), None).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(
        ServerBuilder::new(addr)
            .with_handler(handler)
            .serve_on(listener, async {
                rx.await.ok();
            }),
    );

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Connected to server"));

    tx.send(()).unwrap();
    let stopped = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop after shutdown")
        .unwrap();
    assert!(stopped.is_ok());
}

#[tokio::test]
async fn test_serve_without_handler_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let result = ServerBuilder::<RequestHandler>::new(addr)
        .serve_on(listener, std::future::pending())
        .await;

    assert!(result.is_err());
}

// tests/common/mod.rs
#![allow(dead_code)]

use romanized_translator::config::BackendConfig;
use tokio::net::TcpListener;
use url::Url;

pub fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        url: Url::parse(base_url).expect("valid test url"),
        ..BackendConfig::default()
    }
}

/// Address that refuses connections: bind an ephemeral port, then release it.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Accepts connections and never answers them.
pub async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind silent server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    format!("http://{}", addr)
}

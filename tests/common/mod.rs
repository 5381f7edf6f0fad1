//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use aggregator_proxy::{Credential, HttpServer, ProxyConfig, Shutdown};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Status, optional `Content-Encoding` and body for one reply.
type Reply = Arc<dyn Fn(&HeaderMap) -> (u16, Option<String>, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Recorded,
    reply: Reply,
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let (status, encoding, body) = (state.reply)(&parts.headers);
    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body: body_bytes.to_vec(),
    });

    let mut response = (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response();
    if let Some(encoding) = encoding {
        response
            .headers_mut()
            .insert(header::CONTENT_ENCODING, encoding.parse().unwrap());
    }
    response
}

/// Start an upstream that records every request and answers with `reply`.
pub async fn start_recording_upstream<F>(reply: F) -> (SocketAddr, Recorded)
where
    F: Fn() -> (u16, String) + Send + Sync + 'static,
{
    start_recording_upstream_with(move |_: &HeaderMap| {
        let (status, body) = reply();
        (status, None, body)
    })
    .await
}

async fn start_recording_upstream_with<F>(reply: F) -> (SocketAddr, Recorded)
where
    F: Fn(&HeaderMap) -> (u16, Option<String>, String) + Send + Sync + 'static,
{
    let requests: Recorded = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        reply: Arc::new(reply),
    };
    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, requests)
}

/// Start an upstream that writes a literal HTTP response to every connection.
pub async fn start_raw_upstream(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start an upstream that compresses whenever the request offers an encoding.
///
/// An offered encoding gets an opaque body tagged with the first listed
/// coding. Otherwise `status` and `body` are sent as plain JSON with a
/// `Content-Length`.
pub async fn start_negotiating_upstream(status: u16, body: &'static str) -> (SocketAddr, Recorded) {
    start_recording_upstream_with(move |headers: &HeaderMap| {
        match headers.get(header::ACCEPT_ENCODING).and_then(|v| v.to_str().ok()) {
            Some(offered) => {
                let coding = offered.split(',').next().unwrap_or("gzip").trim().to_string();
                (status, Some(coding), "\u{1f}\u{8b}compressed".to_string())
            }
            None => (status, None, body.to_string()),
        }
    })
    .await
}

/// An address with nothing listening on it.
pub async fn closed_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Proxy config pointing at a local upstream.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}", upstream);
    config.upstream.use_system_proxy = false;
    config
}

/// Spawn a proxy on an ephemeral port.
pub async fn spawn_proxy(config: ProxyConfig, credential: Credential) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config, credential).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

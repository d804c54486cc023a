//! Shared utilities for integration tests: programmable mock mirrors.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mirror_ranker::RankerConfig;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const CANARY: &str = "canary01";
pub const CANARY_ALT: &str = "canary02";

/// Canned response for one request.
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn json(value: Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: value.to_string(),
        }
    }

    pub fn audio() -> Self {
        Self {
            status: 200,
            content_type: "audio/webm",
            body: "OggS-not-really".to_string(),
        }
    }

    pub fn html() -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body: "<html>blocked</html>".to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain",
            body: "not found".to_string(),
        }
    }
}

/// Start a mock mirror that answers each request path (including query) via `routes`.
pub async fn start_mirror<F>(routes: F) -> SocketAddr
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let routes = routes.clone();
                    tokio::spawn(async move {
                        let Some(path) = read_request_path(&mut socket).await else {
                            return;
                        };
                        let response = routes(&path);
                        let status_text = match response.status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            _ => "200 OK",
                        };
                        let raw = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response.content_type,
                            response.body.len(),
                            response.body
                        );
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a server that accepts connections and never answers.
pub async fn start_silent_mirror() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

pub fn base(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Default config with a single canary and a short timeout.
pub fn test_config() -> RankerConfig {
    let mut config = RankerConfig::default();
    config.probe.canary_streams = vec![CANARY.to_string()];
    config.probe.timeout_ms = 2_000;
    config.probe.use_system_proxy = false;
    config
}

/// Default config with both canaries, so the pinned second-canary steps run.
pub fn two_canary_config() -> RankerConfig {
    let mut config = test_config();
    config.probe.canary_streams.push(CANARY_ALT.to_string());
    config
}

/// Primary-dialect mirror. `media` answers the proxied audio request.
pub fn primary_routes(title: &'static str, media: fn() -> MockResponse) -> impl Fn(&str) -> MockResponse {
    move |path: &str| {
        if path.starts_with("/opensearch/suggestions") {
            MockResponse::json(json!(["the", ["the one", "theory"]]))
        } else if path == format!("/streams/{}", CANARY) {
            MockResponse::json(json!({
                "title": title,
                "audioStreams": [
                    {"mimeType": "audio/mp4", "bitrate": 130000, "url": "https://proxy.elsewhere.net/videoplayback?id=hi&host=rr1.media.net"},
                    {"mimeType": "audio/webm", "bitrate": 50000, "url": "https://proxy.elsewhere.net/videoplayback?id=lo&host=rr1.media.net"}
                ]
            }))
        } else if path.starts_with("/videoplayback?id=lo") {
            media()
        } else {
            MockResponse::not_found()
        }
    }
}

/// Secondary-dialect mirror.
pub fn secondary_routes(title: &'static str) -> impl Fn(&str) -> MockResponse {
    move |path: &str| {
        if path.starts_with("/api/v1/search/suggestions") {
            MockResponse::json(json!({"query": "the", "suggestions": ["the one"]}))
        } else if path == format!("/api/v1/videos/{}", CANARY) {
            MockResponse::json(json!({
                "title": title,
                "adaptiveFormats": [
                    {"type": "video/mp4", "bitrate": "900000", "url": "https://media.net/videoplayback?id=video"},
                    {"type": "audio/webm", "bitrate": "48000", "url": "https://media.net/videoplayback?id=audio"}
                ]
            }))
        } else if path.starts_with("/videoplayback?id=audio") {
            MockResponse::audio()
        } else {
            MockResponse::not_found()
        }
    }
}

/// Tertiary-dialect mirror.
pub fn tertiary_routes() -> impl Fn(&str) -> MockResponse {
    |path: &str| {
        if path.starts_with("/channel/") {
            MockResponse::json(json!({"name": "Artist", "playlistId": "PL123"}))
        } else {
            MockResponse::not_found()
        }
    }
}

/// Primary-dialect mirror whose second-canary manifest lists a proxied stream
/// that names `origin` in its `host` parameter.
pub fn primary_routes_with_origin(title: &'static str, origin: SocketAddr) -> impl Fn(&str) -> MockResponse {
    let routes = primary_routes(title, MockResponse::audio);
    move |path: &str| {
        if path == format!("/streams/{}", CANARY_ALT) {
            MockResponse::json(json!({
                "title": title,
                "audioStreams": [
                    {"mimeType": "audio/mp4", "bitrate": 130000, "url": format!("http://proxy.invalid/videoplayback?id=first&host={}", origin)},
                    {"mimeType": "audio/webm", "bitrate": 50000, "url": format!("http://proxy.invalid/videoplayback?id=lo&host={}", origin)}
                ]
            }))
        } else {
            routes(path)
        }
    }
}

/// Secondary-dialect mirror whose second-canary manifest points straight at `origin`.
pub fn secondary_routes_with_origin(title: &'static str, origin: SocketAddr) -> impl Fn(&str) -> MockResponse {
    let routes = secondary_routes(title);
    move |path: &str| {
        if path == format!("/api/v1/videos/{}", CANARY_ALT) {
            MockResponse::json(json!({
                "title": title,
                "adaptiveFormats": [
                    {"type": "audio/webm", "bitrate": "160000", "url": format!("http://{}/videoplayback?id=high", origin)},
                    {"type": "audio/mp4", "bitrate": "48000", "url": format!("http://{}/videoplayback?id=direct", origin)}
                ]
            }))
        } else {
            routes(path)
        }
    }
}

/// Media host serving only the streams the second canary should reach.
pub fn origin_routes() -> impl Fn(&str) -> MockResponse {
    |path: &str| {
        if path.starts_with("/videoplayback?id=first") || path.starts_with("/videoplayback?id=direct") {
            MockResponse::audio()
        } else {
            MockResponse::not_found()
        }
    }
}

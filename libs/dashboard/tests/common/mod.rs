//! Common test utilities for dashboard integration tests
//!
//! A routed HTTP/1.1 mock of the trade review API. Each path has its own
//! reply script; request `i` on a path gets `replies[min(i, len - 1)]`.

#![allow(dead_code)]

use dashboard::infrastructure::config::{ApiConfig, DashboardConfig};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body with the given status, optionally after a delay
    Json {
        status: u16,
        body: String,
        delay: Duration,
    },
    /// 200 event stream: write the frames, then hold or close
    Stream { frames: Vec<String>, hold_open: bool },
}

impl Reply {
    pub fn json(body: serde_json::Value) -> Self {
        Reply::Json {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Reply::Json {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        match self {
            Reply::Json { status, body, .. } => Reply::Json {
                status,
                body,
                delay,
            },
            stream => stream,
        }
    }

    pub fn stream(frames: &[&str], hold_open: bool) -> Self {
        Reply::Stream {
            frames: frames.iter().map(|f| f.to_string()).collect(),
            hold_open,
        }
    }
}

type Routes = HashMap<String, Vec<Reply>>;

pub struct MockApiServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockApiServer {
    /// Routes are full request paths, e.g. `/api/livestream/latest`
    pub async fn start(routes: Vec<(&str, Vec<Reply>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let routes: Arc<Routes> = Arc::new(
            routes
                .into_iter()
                .map(|(path, replies)| (path.to_string(), replies))
                .collect(),
        );

        let shutdown_clone = shutdown.clone();
        let hits_clone = hits.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { break };
                        let routes = routes.clone();
                        let hits = hits_clone.clone();
                        let shutdown = shutdown_clone.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, routes, hits, shutdown).await;
                        });
                    }
                    _ = shutdown_clone.notified() => break,
                }
            }
        });

        Self {
            addr,
            shutdown,
            hits,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.api = self.api_config();
        config.stream.reconnect.enabled = false;
        config
    }

    /// Requests received on `path` so far
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    routes: Arc<Routes>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    shutdown: Arc<Notify>,
) {
    let Some(head) = read_request_head(&mut stream).await else {
        return;
    };
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let index = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(path.clone()).or_insert(0);
        *count += 1;
        *count - 1
    };

    let reply = routes
        .get(&path)
        .and_then(|replies| replies.get(index.min(replies.len().saturating_sub(1))))
        .cloned()
        .unwrap_or_else(|| Reply::raw(404, "{\"detail\":\"Not Found\"}"));

    match reply {
        Reply::Json {
            status,
            body,
            delay,
        } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let response = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Stream { frames, hold_open } => {
            let head = "HTTP/1.1 200 OK\r\n\
                        Content-Type: text/event-stream\r\n\
                        Cache-Control: no-cache\r\n\
                        Connection: close\r\n\r\n";
            if stream.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for frame in frames {
                if stream.write_all(frame.as_bytes()).await.is_err() {
                    return;
                }
                let _ = stream.flush().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            if hold_open {
                tokio::select! {
                    _ = shutdown.notified() => {}
                    _ = tokio::time::sleep(Duration::from_secs(30)) => {}
                }
            }
            let _ = stream.shutdown().await;
        }
    }
}

async fn read_request_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return Some(String::from_utf8_lossy(&buf).into_owned());
        }
    }
}

/// Poll `condition` every 10ms until it holds or [`WAIT`] runs out
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

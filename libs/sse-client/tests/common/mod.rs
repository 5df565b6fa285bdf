//! Common test utilities for sse-client integration tests
//!
//! A scripted HTTP/1.1 server speaking just enough of the protocol to
//! serve `text/event-stream` responses.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// What the server answers on the n-th connection
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 event stream: write the frames, then hold the connection or close it
    Stream { frames: Vec<String>, hold_open: bool },
    /// Bare status line with an empty body
    Status(u16),
}

impl Reply {
    pub fn stream(frames: &[&str], hold_open: bool) -> Self {
        Reply::Stream {
            frames: frames.iter().map(|f| f.to_string()).collect(),
            hold_open,
        }
    }
}

/// Mock SSE server; connection `i` gets `replies[min(i, len - 1)]`
pub struct MockSseServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockSseServer {
    pub async fn start(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "at least one reply is required");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let replies = Arc::new(replies);
        let counter = Arc::new(AtomicUsize::new(0));

        let shutdown_clone = shutdown.clone();
        let requests_clone = requests.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let index = counter.fetch_add(1, Ordering::SeqCst);
                                let reply = replies[index.min(replies.len() - 1)].clone();
                                let shutdown = shutdown_clone.clone();
                                let requests = requests_clone.clone();
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, reply, requests, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Raw request heads received so far, lowercased
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    async fn handle_connection(
        mut stream: TcpStream,
        reply: Reply,
        requests: Arc<Mutex<Vec<String>>>,
        shutdown: Arc<Notify>,
    ) {
        let head = match read_request_head(&mut stream).await {
            Some(head) => head,
            None => return,
        };
        requests.lock().unwrap().push(head.to_lowercase());

        match reply {
            Reply::Status(code) => {
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    code
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
}

impl Drop for MockSseServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
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

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use availability_monitor::config::MonitorConfig;
use availability_monitor::lifecycle::startup::{initialize_with_sink, Services};
use availability_monitor::storage::MemoryRecordSink;

/// How the mock target answers one request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &'static str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock target.
pub struct MockTarget {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl MockTarget {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

/// Start a programmable target. `f` receives the zero-based request number.
pub async fn start_mock_target<F>(f: F) -> MockTarget
where
    F: Fn(usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let hits = Arc::new(AtomicUsize::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let target = MockTarget {
        addr,
        hits: hits.clone(),
        max_in_flight: max_in_flight.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let hits = hits.clone();
                    let in_flight = in_flight.clone();
                    let max_in_flight = max_in_flight.clone();
                    tokio::spawn(async move {
                        let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_in_flight.fetch_max(current, Ordering::SeqCst);
                        let n = hits.fetch_add(1, Ordering::SeqCst);
                        serve(socket, f(n)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    });
                }
                Err(_) => break,
            }
        }
    });

    target
}

async fn serve(mut socket: TcpStream, reply: Reply) {
    // Read the request head before answering.
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    tokio::time::sleep(reply.delay).await;

    let reason = match reply.status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason,
        reply.body.len(),
        reply.body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// A loopback address with nothing listening on it.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Services probing `url` with an in-memory sink.
pub fn services_for(url: &str, timeout_secs: u64) -> (Services, Arc<MemoryRecordSink>) {
    let mut config = MonitorConfig::default();
    config.target.url = url.to_string();
    config.target.timeout_secs = timeout_secs;

    let sink = Arc::new(MemoryRecordSink::new(config.storage.memory_capacity));
    let services = initialize_with_sink(&config, sink.clone()).unwrap();
    (services, sink)
}

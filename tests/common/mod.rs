// Shared helpers for end-to-end tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use productos::catalog::ProductSource;
use productos::{AppState, Config, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    active: Arc<AtomicUsize>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral loopback port
    pub fn start(extra_toml: &str, source: Option<Arc<dyn ProductSource>>) -> Self {
        let toml = format!(
            "[server]\nport = 0\n{extra_toml}\n[logging]\naccess_log = false\nlevel = \"error\"\n"
        );
        let cfg = Config::from_toml_str(&toml).expect("valid test config");
        let state = match source {
            Some(source) => AppState::with_product_source(&cfg, source),
            None => AppState::new(&cfg),
        };

        let server = Server::bind(Arc::new(state)).expect("bind test server");
        let addr = server.local_addr().expect("local addr");
        let active = server.active_connections();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async {
            let _ = rx.await;
        }));

        Self {
            addr,
            active,
            shutdown: Some(tx),
            handle,
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }

    /// Connections the server is currently serving
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Open a keep-alive connection, complete one GET on it and leave it idle
    pub async fn idle_keep_alive(&self, path: &str) -> (TcpStream, HttpResponse) {
        let mut stream = TcpStream::connect(self.addr).await.expect("connect");
        let request = format!("GET {path} HTTP/1.1\r\nHost: {}\r\n\r\n", self.addr);
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write request");

        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.expect("read response");
            assert!(n > 0, "connection closed before the response was complete");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(response) = HttpResponse::parse_complete(&raw) {
                return (stream, response);
            }
        }
    }

    pub async fn get(&self, path: &str) -> HttpResponse {
        self.send(&format!(
            "GET {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.addr
        ))
        .await
    }

    /// Send a raw HTTP/1.1 request and read the response until close
    pub async fn send(&self, raw_request: &str) -> HttpResponse {
        let mut stream = TcpStream::connect(self.addr).await.expect("connect");
        stream
            .write_all(raw_request.as_bytes())
            .await
            .expect("write request");
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.expect("read response");
        HttpResponse::parse(&raw)
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let (head, body) = text.split_once("\r\n\r\n").expect("header terminator");
        let mut lines = head.lines();
        let status_line = lines.next().expect("status line");
        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .expect("status code");
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        Self {
            status,
            headers,
            body: body.to_string(),
        }
    }

    /// Parse once the head and a `Content-Length` body have fully arrived
    fn parse_complete(raw: &[u8]) -> Option<Self> {
        let head_end = raw.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
        let response = Self::parse(raw);
        let length: usize = response.header("content-length")?.parse().ok()?;
        (raw.len() >= head_end + length).then_some(response)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `<table>...</table>` part of the body
    pub fn table(&self) -> &str {
        let start = self.body.find("<table>").expect("table start");
        let end = self.body.find("</table>").expect("table end") + "</table>".len();
        &self.body[start..end]
    }
}

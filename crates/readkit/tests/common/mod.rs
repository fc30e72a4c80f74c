//! Minimal HTTP/1.1 upstream for integration tests.
//!
//! Stands in for the extraction service. Records each request head and
//! reports when the client closes its side of a connection, so tests can
//! observe that an aborted request really went away.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// How the upstream answers every request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status and body with an exact `Content-Length`.
    Fixed { status: u16, body: Vec<u8> },
    /// Status with extra headers and an empty body.
    Headers {
        status: u16,
        headers: Vec<(String, String)>,
    },
    /// 200 with no `Content-Length`; the body ends when the server closes.
    CloseDelimited(Vec<u8>),
    /// 200 declaring `Content-Length` but never sending the body.
    DeclareOnly(u64),
    /// Read the request and never answer.
    Stall,
    /// Close the connection without answering.
    Hangup,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::Fixed {
            status: 200,
            body: body.into(),
        }
    }
}

pub struct MockUpstream {
    /// Base URL with a trailing slash, e.g. `http://127.0.0.1:40123/`
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    closed: mpsc::UnboundedReceiver<()>,
}

impl MockUpstream {
    /// Start serving `reply` on an ephemeral local port.
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (closed_tx, closed) = mpsc::unbounded_channel();

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let recorded = Arc::clone(&recorded);
                let closed_tx = closed_tx.clone();
                tokio::spawn(async move {
                    handle(stream, reply, recorded).await;
                    let _ = closed_tx.send(());
                });
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}/"),
            requests,
            closed,
        }
    }

    /// Request heads received so far (request line plus headers).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    /// Wait until some connection has been closed by either side.
    pub async fn wait_closed(&mut self, within: Duration) -> bool {
        matches!(
            tokio::time::timeout(within, self.closed.recv()).await,
            Ok(Some(()))
        )
    }
}

async fn handle(mut stream: TcpStream, reply: Reply, requests: Arc<Mutex<Vec<String>>>) {
    let Some(head) = read_head(&mut stream).await else {
        return;
    };
    requests.lock().expect("lock").push(head);

    match reply {
        Reply::Fixed { status, body } => {
            let head = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\n\r\n",
                reason(status),
                body.len()
            );
            if stream.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            if stream.write_all(&body).await.is_err() {
                return;
            }
        }
        Reply::Headers { status, headers } => {
            let mut head = format!("HTTP/1.1 {status} {}\r\n", reason(status));
            for (name, value) in headers {
                head.push_str(&format!("{name}: {value}\r\n"));
            }
            head.push_str("Content-Length: 0\r\n\r\n");
            if stream.write_all(head.as_bytes()).await.is_err() {
                return;
            }
        }
        Reply::CloseDelimited(body) => {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n";
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
            return;
        }
        Reply::DeclareOnly(length) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {length}\r\n\r\n"
            );
            if stream.write_all(head.as_bytes()).await.is_err() {
                return;
            }
        }
        Reply::Stall => {}
        Reply::Hangup => return,
    }

    // Hold the connection open until the client goes away
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(_) => continue,
        }
    }
}

async fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        if buf.len() > 64 * 1024 {
            return None;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        429 => "Too Many Requests",
        502 => "Bad Gateway",
        _ => "Status",
    }
}

//! Shared doubles for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use price_cache::{PriceError, PriceSource};
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the scripted source answers on its next call.
pub enum Reply {
    Prices(Vec<(&'static str, f64)>),
    RateLimited,
    Status(u16),
    /// A body that is not a JSON object of quotes.
    Malformed,
    /// Never answers within any reasonable timeout.
    Hang,
}

/// A `PriceSource` that plays back queued replies and records every request.
///
/// Once the queue is empty it answers with an empty price map.
pub struct ScriptedSource {
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<Reply>>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self::with_delay(replies, Duration::ZERO)
    }

    pub fn with_delay(replies: Vec<Reply>, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(ids.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match reply {
            None => Ok(HashMap::new()),
            Some(Reply::Prices(prices)) => Ok(prices
                .into_iter()
                .map(|(id, price)| (id.to_string(), price))
                .collect()),
            Some(Reply::RateLimited) => Err(PriceError::RateLimited),
            Some(Reply::Status(code)) => Err(PriceError::Status(
                StatusCode::from_u16(code).unwrap(),
            )),
            Some(Reply::Malformed) => {
                let err = serde_json::from_str::<HashMap<String, serde_json::Value>>("[1, 2, 3]")
                    .unwrap_err();
                Err(PriceError::Decode(err))
            }
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(HashMap::new())
            }
        }
    }
}

/// A one-shot HTTP responder on a random local port.
///
/// Serves a single connection with the given status and body, then closes
/// the listener. The receiver yields the request line it saw.
pub async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                eprintln!("Accept error: {}", e);
                return;
            }
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let request = String::from_utf8_lossy(&request);
        let request_line = request.lines().next().unwrap_or_default().to_string();

        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        let _ = tx.send(request_line);
    });

    (format!("http://{}/api/v3", addr), rx)
}

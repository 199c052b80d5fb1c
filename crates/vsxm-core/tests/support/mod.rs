//! Shared helpers for integration tests: a canned-response HTTP server and
//! fixture builders.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use vsxm_core::config::VsxmConfig;
use vsxm_core::context::AppContext;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Send the body in this many pieces, pausing before each one
    pub trickle: Option<(usize, Duration)>,
}

impl StubResponse {
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: serde_json::to_vec(&value).unwrap(),
            trickle: None,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            trickle: None,
        }
    }

    /// Same response, body spread over `chunks` writes `delay` apart.
    pub fn trickled(mut self, chunks: usize, delay: Duration) -> Self {
        self.trickle = Some((chunks.max(1), delay));
        self
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.as_bytes().to_vec(),
            trickle: None,
        }
    }
}

/// HTTP/1.1 server on 127.0.0.1 answering every request with `handler`.
///
/// Connections are served one at a time on a background thread and closed
/// after each response.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &handler, &recorded);
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve<F>(
    mut stream: TcpStream,
    handler: &F,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()>
where
    F: Fn(&RecordedRequest) -> StubResponse,
{
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    let request = RecordedRequest { method, path, body };
    let response = handler(&request);
    // Record before answering so the client never observes a missing entry
    recorded.lock().unwrap().push(request);

    let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    stream.write_all(head.as_bytes()).ok()?;
    match response.trickle {
        Some((chunks, delay)) => {
            let size = response.body.len().div_ceil(chunks).max(1);
            for piece in response.body.chunks(size) {
                stream.flush().ok()?;
                thread::sleep(delay);
                stream.write_all(piece).ok()?;
            }
        }
        None => stream.write_all(&response.body).ok()?,
    }
    stream.flush().ok()
}

/// Context pointing at `base_url` and installing into `extensions_dir`.
pub fn context_for(base_url: &str, extensions_dir: &Path) -> AppContext {
    context_with_timeout(base_url, extensions_dir, 10)
}

pub fn context_with_timeout(base_url: &str, extensions_dir: &Path, timeout_secs: u64) -> AppContext {
    let mut config = VsxmConfig::new();
    config.marketplace.base_url = base_url.to_string();
    config.marketplace.timeout_secs = timeout_secs;
    config.extensions_dir = Some(extensions_dir.to_path_buf());
    AppContext::from_config(config).expect("valid test config")
}

/// Deterministic, poorly compressible payload of `len` bytes.
pub fn package_bytes(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xff) as u8
        })
        .collect()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// One marketplace extension entry in gallery response shape.
pub fn gallery_extension(
    publisher: &str,
    name: &str,
    version: &str,
    installs: f64,
    rating: Option<f64>,
) -> serde_json::Value {
    let mut statistics = vec![serde_json::json!({ "statisticName": "install", "value": installs })];
    if let Some(rating) = rating {
        statistics.push(serde_json::json!({ "statisticName": "averagerating", "value": rating }));
    }
    statistics.push(serde_json::json!({ "statisticName": "ratingcount", "value": 12.0 }));

    serde_json::json!({
        "publisher": { "publisherName": publisher, "displayName": publisher },
        "extensionName": name,
        "displayName": format!("{name} display"),
        "shortDescription": format!("{name} description"),
        "versions": [{ "version": version, "lastUpdated": "2024-01-01T00:00:00Z" }],
        "statistics": statistics
    })
}

pub fn gallery_response(extensions: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "extensions": extensions,
            "resultMetadata": []
        }]
    })
}

/// Names of all entries in `dir`.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

//! Minimal HTTP/1.1 server that supports Range GET for integration tests.
//!
//! Serves static bodies by path. Responds to GET with Range with 206 Partial
//! Content (or 416 past the end), to unknown paths with 404, and records every
//! request line and Range header it sees.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
        }
    }
}

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub path: String,
    pub range: Option<String>,
}

pub struct RangeServer {
    base: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl RangeServer {
    /// Full URL for `path` (e.g. `/foo.tar.gz`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `routes` (path, body).
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Vec<u8>)>) -> RangeServer {
    start_with_options(routes, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior (ranges ignored, etc.).
pub fn start_with_options(routes: Vec<(&str, Vec<u8>)>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<Vec<(String, Vec<u8>)>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, b)| (p.to_string(), b))
            .collect(),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen_srv);
            thread::spawn(move || handle(stream, &routes, &seen, opts));
        }
    });
    RangeServer {
        base: format!("http://127.0.0.1:{}", port),
        seen,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &[(String, Vec<u8>)],
    seen: &Mutex<Vec<SeenRequest>>,
    opts: RangeServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let parsed = parse_request(request);
    seen.lock().unwrap().push(SeenRequest {
        path: parsed.path.to_string(),
        range: parsed.range_header.map(str::to_string),
    });

    if !parsed.method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    let body = match routes.iter().find(|(p, _)| p == parsed.path) {
        Some((_, body)) => body.as_slice(),
        None => {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
            return;
        }
    };

    let total = body.len() as u64;
    let (status, range_header, slice) = match parsed.range.filter(|_| opts.support_ranges) {
        Some((start, end_incl)) => {
            let start = start.min(total);
            let end_incl = end_incl.min(total.saturating_sub(1));
            if total == 0 || start > end_incl {
                (
                    "416 Range Not Satisfiable",
                    format!("bytes */{}", total),
                    &body[0..0],
                )
            } else {
                let start = start as usize;
                let end_excl = (end_incl + 1).min(total) as usize;
                (
                    "206 Partial Content",
                    format!("bytes {}-{}/{}", start, end_excl - 1, total),
                    &body[start..end_excl],
                )
            }
        }
        None => (
            "200 OK",
            format!("bytes 0-{}/{}", total.saturating_sub(1), total),
            body,
        ),
    };
    let accept_ranges = if opts.support_ranges {
        "Accept-Ranges: bytes\r\n"
    } else {
        ""
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Range: {}\r\n{}Connection: close\r\n\r\n",
        status,
        slice.len(),
        range_header,
        accept_ranges
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(slice);
}

struct ParsedRequest<'a> {
    method: &'a str,
    path: &'a str,
    range_header: Option<&'a str>,
    /// (start, end_inclusive) for `Range: bytes=X-Y`.
    range: Option<(u64, u64)>,
}

fn parse_request(request: &str) -> ParsedRequest<'_> {
    let mut parsed = ParsedRequest {
        method: "",
        path: "",
        range_header: None,
        range: None,
    };
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if parsed.method.is_empty() {
            let mut parts = line.split_whitespace();
            parsed.method = parts.next().unwrap_or("");
            parsed.path = parts.next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                parsed.range_header = Some(value);
                if value.to_lowercase().starts_with("bytes=") {
                    let part = value[6..].trim();
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        parsed.range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    parsed
}

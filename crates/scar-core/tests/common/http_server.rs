//! Minimal HTTP/1.1 server answering HEAD and GET for integration tests.
//!
//! Serves a single static body. HEAD reports a configurable Content-Length so
//! tests can make the probe disagree with what GET actually streams.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Status returned for HEAD (e.g. 404 to simulate a missing artifact).
    pub head_status: u16,
    /// Status returned for GET.
    pub get_status: u16,
    /// If set, HEAD reports this Content-Length instead of the body length.
    pub head_length_override: Option<u64>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            head_status: 200,
            get_status: 200,
            head_length_override: None,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ServerOptions::default())
}

/// Like `start` but allows customizing server behavior (HEAD blocked, sizes lying, etc.).
pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/artifact.bin", port)
}

fn status_line(status: u16) -> String {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Status",
    };
    format!("HTTP/1.1 {} {}\r\n", status, reason)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: ServerOptions) {
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
    let method = request.split_whitespace().next().unwrap_or("");

    if method.eq_ignore_ascii_case("HEAD") {
        if opts.head_status != 200 {
            let response = format!("{}Content-Length: 0\r\n\r\n", status_line(opts.head_status));
            let _ = stream.write_all(response.as_bytes());
            return;
        }
        let reported = opts.head_length_override.unwrap_or(body.len() as u64);
        let response = format!(
            "{}Content-Length: {}\r\n\r\n",
            status_line(200),
            reported
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        if opts.get_status != 200 {
            let response = format!(
                "{}Content-Length: 5\r\n\r\noops\n",
                status_line(opts.get_status)
            );
            let _ = stream.write_all(response.as_bytes());
            return;
        }
        let response = format!("{}Content-Length: {}\r\n\r\n", status_line(200), body.len());
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}

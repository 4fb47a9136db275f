//! Minimal HTTP/1.1 server that echoes requests back, for integration tests.
//!
//! Routes:
//! - `/status/<n>`: answers with status `n`
//! - `/gzip`: gzip-compressed text with `Content-Encoding: gzip`
//! - `/bytes`: the fixed binary body [`BINARY_BODY`]
//! - `/slow`: answers after two seconds
//! - anything else: 200 whose body is the raw request (head and body)
//!
//! Every response carries `Server`, two `Set-Cookie` and `Last-Modified`.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

pub const SERVER_NAME: &str = "xreq-echo";
pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";
pub const GZIP_TEXT: &str = "compressed hello from the echo server";
pub const BINARY_BODY: [u8; 8] = [0x00, 0x9f, 0x92, 0x96, 0xff, 0x0a, 0x0d, 0x80];

/// Starts the server on an ephemeral port. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };
    let target = head
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let path = target.split('?').next().unwrap_or("/");

    if let Some(code) = path.strip_prefix("/status/") {
        let code: u32 = code.parse().unwrap_or(500);
        let text = format!("status {}", code);
        respond(&mut stream, code, &[("Content-Type", "text/plain")], text.as_bytes());
    } else if path == "/gzip" {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(GZIP_TEXT.as_bytes()).unwrap();
        let compressed = enc.finish().unwrap();
        respond(
            &mut stream,
            200,
            &[("Content-Type", "text/plain; charset=utf-8"), ("Content-Encoding", "gzip")],
            &compressed,
        );
    } else if path == "/bytes" {
        respond(&mut stream, 200, &[("Content-Type", "application/octet-stream")], &BINARY_BODY);
    } else if path == "/slow" {
        thread::sleep(Duration::from_secs(2));
        respond(&mut stream, 200, &[("Content-Type", "text/plain")], b"late");
    } else {
        let mut echoed = head.into_bytes();
        echoed.extend_from_slice(&body);
        respond(&mut stream, 200, &[("Content-Type", "text/plain; charset=utf-8")], &echoed);
    }
}

/// Reads the head (up to and including the blank line) and a `Content-Length` body.
fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };
    let head = String::from_utf8_lossy(&data[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = data[head_end..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&buf[..n]),
        }
    }
    body.truncate(content_length);
    Some((head, body))
}

fn respond(stream: &mut TcpStream, status: u32, headers: &[(&str, &str)], body: &[u8]) {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let mut head = format!("HTTP/1.1 {} {}\r\n", status, reason);
    head.push_str(&format!("Server: {}\r\n", SERVER_NAME));
    head.push_str("Set-Cookie: a=1; Path=/\r\n");
    head.push_str("Set-Cookie: b=2; Path=/\r\n");
    head.push_str(&format!("Last-Modified: {}\r\n", LAST_MODIFIED));
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()));
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

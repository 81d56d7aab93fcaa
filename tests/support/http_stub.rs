//! Threaded canned-response HTTP server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Clone)]
pub struct Route {
    path: &'static str,
    body_contains: Option<&'static str>,
    delay: Duration,
    response: String,
}

impl Route {
    pub fn new(path: &'static str, response: String) -> Self {
        Self {
            path,
            body_contains: None,
            delay: Duration::ZERO,
            response,
        }
    }

    /// Only match requests whose body contains `needle`.
    pub fn when_body_contains(mut self, needle: &'static str) -> Self {
        self.body_contains = Some(needle);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serve `routes`, handling each connection on its own thread so delayed
/// responses overlap. Returns the base URL.
pub fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://{addr}")
}

fn handle(mut stream: TcpStream, routes: &[Route]) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let (path, body) = read_request(&mut stream);
    let route = routes.iter().find(|route| {
        route.path == path
            && route
                .body_contains
                .is_none_or(|needle| body.contains(needle))
    });
    let response = match route {
        Some(route) => {
            thread::sleep(route.delay);
            route.response.clone()
        }
        None => status(404, "Not Found"),
    };
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break None;
        }
        data.extend_from_slice(&buf[..read]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break Some(pos + 4);
        }
    };
    let Some(header_end) = header_end else {
        return (String::new(), String::new());
    };
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
    }
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();
    (path, body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub fn json(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

pub fn status(code: u16, reason: &str) -> String {
    format!("HTTP/1.1 {code} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}

/// A base URL nothing is listening on.
pub fn unreachable() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// `/predict` body for a single prediction.
pub fn prediction(text: &str, label: &str, mode: &str) -> String {
    json(&format!(
        r#"{{"predictions":[{{"text":"{text}","label":"{label}","confidence":0.87,"probabilities":{{"{label}":0.87,"World":0.13}},"model":"distilbert-agnews","latency_ms":12.4}}],"mode":"{mode}"}}"#
    ))
}

//! Minimal HTTP/1.1 server for integration tests.
//!
//! Replies to each connection with the next entry of a script and repeats
//! the last entry once the script runs out. A `Reply::Hang` entry accepts
//! the request but never answers, to exercise per-attempt timeouts.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str),
    /// 302 to the given path on the same server.
    Redirect(&'static str),
    Hang(Duration),
}

/// Handle to a running server. The server runs until the process exits.
pub struct HealthServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl HealthServer {
    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw head (request line + headers) of every request received.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `status` with `body` on every request.
pub fn always(status: u16, body: &'static str) -> HealthServer {
    start(vec![Reply::Status(status, body)])
}

/// Serve the script in order, one entry per connection.
pub fn start(script: Vec<Reply>) -> HealthServer {
    assert!(!script.is_empty());
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(script);

    let hits_srv = Arc::clone(&hits);
    let requests_srv = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = hits_srv.fetch_add(1, Ordering::SeqCst);
            let reply = script[n.min(script.len() - 1)].clone();
            let requests = Arc::clone(&requests_srv);
            thread::spawn(move || handle(stream, reply, &requests));
        }
    });

    HealthServer {
        url: format!("http://127.0.0.1:{}/health", port),
        hits,
        requests,
    }
}

/// A URL on a port nobody listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/health", port)
}

fn handle(mut stream: TcpStream, reply: Reply, requests: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let head = match read_head(&mut stream) {
        Some(h) => h,
        None => return,
    };
    let is_head = head.starts_with("HEAD ");
    requests.lock().unwrap().push(head);

    match reply {
        Reply::Hang(d) => thread::sleep(d),
        Reply::Redirect(location) => {
            let response = format!(
                "HTTP/1.1 302 X\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(response.as_bytes());
        }
        Reply::Status(status, body) => {
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            if !is_head {
                let _ = stream.write_all(body.as_bytes());
            }
        }
    }
}

/// Read until the blank line that ends the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

#![allow(dead_code)]
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use odm_get::Config;
use odm_get::core::console::{Console, SharedBuffer};

/// Canned HTTP/1.1 response, written in `chunks` with `pause` in between.
#[derive(Clone)]
pub struct Reply {
    pub head: String,
    pub chunks: Vec<Vec<u8>>,
    pub pause: Duration,
}

impl Reply {
    pub fn ok_with_length(body: &[u8]) -> Self {
        Self {
            head: format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            ),
            chunks: vec![body.to_vec()],
            pause: Duration::ZERO,
        }
    }

    /// No Content-Length: the body ends when the connection closes.
    pub fn ok_streamed(chunks: Vec<Vec<u8>>, pause: Duration) -> Self {
        Self {
            head: "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_string(),
            chunks,
            pause,
        }
    }

    pub fn status(line: &str) -> Self {
        Self {
            head: format!("HTTP/1.1 {line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"),
            chunks: Vec::new(),
            pause: Duration::ZERO,
        }
    }

    /// Announces `announced` bytes but sends only `body`.
    pub fn truncated(body: &[u8], announced: usize) -> Self {
        Self {
            head: format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {announced}\r\nConnection: close\r\n\r\n"
            ),
            chunks: vec![body.to_vec()],
            pause: Duration::ZERO,
        }
    }
}

/// Loopback server answering every connection with the same reply.
pub struct MockServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = reply.clone();
                thread::spawn(move || serve(stream, &reply));
            }
        });

        Self { addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn serve(mut stream: TcpStream, reply: &Reply) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let _ = stream.write_all(reply.head.as_bytes());
    for chunk in &reply.chunks {
        let _ = stream.write_all(chunk);
        let _ = stream.flush();
        thread::sleep(reply.pause);
    }
    let _ = stream.shutdown(std::net::Shutdown::Both);
}

pub fn test_config(dir: &std::path::Path) -> Config {
    Config {
        output_dir: dir.to_path_buf(),
        report_interval_ms: 20,
        ..Config::default()
    }
}

pub fn capture() -> (Console, SharedBuffer) {
    let buffer = SharedBuffer::new();
    (Console::new(buffer.clone()), buffer)
}

/// Sink that rejects the bare newline ending the progress line and accepts
/// everything else.
#[derive(Clone, Default)]
pub struct BrokenNewline(SharedBuffer);

impl BrokenNewline {
    pub fn contents(&self) -> String {
        self.0.contents()
    }
}

impl Write for BrokenNewline {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf == b"\n" {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
        }
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

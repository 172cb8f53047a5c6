//! Common test utilities for blitzortung integration tests
//!
//! A local feed server speaking the same wire format as the public one, and
//! the matching compressor for building its frames.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Compress `input` the way the feed server does
///
/// Emits one code point per phrase: literals as themselves, dictionary
/// phrases as codes counting up from 256.
pub fn lzw_encode(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let Some((&first, rest)) = chars.split_first() else {
        return String::new();
    };

    let mut dictionary: HashMap<String, u32> = HashMap::new();
    let mut next_code = 256u32;
    let mut output = Vec::new();
    let mut phrase = first.to_string();

    let code_of = |phrase: &str, dictionary: &HashMap<String, u32>| -> u32 {
        if phrase.chars().count() > 1 {
            dictionary[phrase]
        } else {
            phrase.chars().next().unwrap() as u32
        }
    };

    for &c in rest {
        let mut candidate = phrase.clone();
        candidate.push(c);

        if dictionary.contains_key(&candidate) {
            phrase = candidate;
        } else {
            output.push(code_of(&phrase, &dictionary));
            dictionary.insert(candidate, next_code);
            next_code += 1;
            phrase = c.to_string();
        }
    }
    output.push(code_of(&phrase, &dictionary));

    output
        .into_iter()
        .map(|code| char::from_u32(code).unwrap())
        .collect()
}

/// How the mock server treats each accepted connection
#[derive(Clone, Default)]
pub struct FeedScript {
    /// JSON documents sent, compressed, after the handshake arrives
    pub records: Vec<String>,

    /// Number of initial connections dropped right after sending `records`
    pub drop_first: usize,
}

/// A mock lightning feed server for testing
pub struct MockFeedServer {
    pub addr: SocketAddr,
    handshakes: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
}

impl MockFeedServer {
    /// Create and start a new mock feed server
    pub async fn start(script: FeedScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handshakes = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(Notify::new());

        {
            let handshakes = Arc::clone(&handshakes);
            let connections = Arc::clone(&connections);
            let shutdown = Arc::clone(&shutdown);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => {
                            match result {
                                Ok((stream, _)) => {
                                    let index = connections.fetch_add(1, Ordering::SeqCst);
                                    let keep_open = index >= script.drop_first;
                                    let script = script.clone();
                                    let handshakes = Arc::clone(&handshakes);
                                    let shutdown = Arc::clone(&shutdown);
                                    tokio::spawn(async move {
                                        Self::handle_connection(stream, script, keep_open, handshakes, shutdown).await;
                                    });
                                }
                                Err(e) => {
                                    eprintln!("Accept error: {}", e);
                                    break;
                                }
                            }
                        }
                        _ = shutdown.notified() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            addr,
            handshakes,
            connections,
            shutdown,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        script: FeedScript,
        keep_open: bool,
        handshakes: Arc<Mutex<Vec<String>>>,
        shutdown: Arc<Notify>,
    ) {
        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        // The client speaks first.
        match read.next().await {
            Some(Ok(Message::Text(text))) => handshakes.lock().push(text),
            _ => return,
        }

        for record in &script.records {
            if write.send(Message::Text(lzw_encode(record))).await.is_err() {
                return;
            }
        }

        if !keep_open {
            return;
        }

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) => {
                            // Flushes the queued close reply.
                            let _ = write.close().await;
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Handshake payloads received so far, one per connection
    pub fn handshakes(&self) -> Vec<String> {
        self.handshakes.lock().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockFeedServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sample strike record as the feed sends it
pub fn strike_json(latitude: f64, longitude: f64) -> String {
    format!(
        r#"{{"time":1700000000123456789,"lat":{},"lon":{},"alt":0,"pol":0,"mds":9931,"mcg":207,"status":0,"region":1,"sig":[{{"sta":1792,"time":3158478,"lat":43.62637,"lon":4.018173,"alt":22,"status":4}}],"delay":3.4}}"#,
        latitude, longitude
    )
}

//! Chat server: exposes the query pipeline over a Unix socket.
//!
//! One connection may carry many framed requests. Every `Chat` request is
//! checked against the configured shared secret before the pipeline runs;
//! a missing or wrong credential is rejected with no provider calls and no
//! session mutation.

pub mod protocol;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;

use crate::error::ChatError;
use crate::models::{APOLOGY_TEXT, ChatReply, ChatRequest, NOT_FOUND_TEXT};
use crate::server::protocol::{Request, Response, StatusResponse, decode_length, encode_message};
use crate::services::{ChatEngine, ChatOutcome, VectorStore};

const MAX_FRAME_BYTES: usize = 10 * 1024 * 1024;

pub struct ChatServer {
    engine: Arc<ChatEngine>,
    store: Arc<dyn VectorStore>,
    api_key: Option<String>,
    socket_path: PathBuf,
    requests_served: AtomicU64,
    shutdown: AtomicBool,
}

impl ChatServer {
    pub fn new(
        engine: Arc<ChatEngine>,
        store: Arc<dyn VectorStore>,
        api_key: Option<String>,
        socket_path: PathBuf,
    ) -> Self {
        Self {
            engine,
            store,
            api_key,
            socket_path,
            requests_served: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }

    pub async fn run(self: &Arc<Self>) -> Result<(), std::io::Error> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        eprintln!("Chat server listening on: {}", self.socket_path.display());
        if self.api_key.is_none() {
            eprintln!("Warning: no API key configured, all chat requests will be rejected");
        }

        let check_interval = std::time::Duration::from_secs(1);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        // Connections are handled concurrently; session
                        // memory serializes per-session internally.
                        Ok((stream, _)) => {
                            let server = Arc::clone(self);
                            tokio::spawn(async move {
                                server.handle_connection(stream).await;
                            });
                        }
                        Err(e) => {
                            eprintln!("Accept error: {}", e);
                        }
                    }
                }
                _ = tokio::time::sleep(check_interval) => {
                    if self.shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    eprintln!("Received SIGINT, shutting down");
                    break;
                }
            }
        }

        let _ = std::fs::remove_file(&self.socket_path);
        eprintln!("Chat server stopped");
        Ok(())
    }

    async fn handle_connection(&self, mut stream: tokio::net::UnixStream) {
        let mut len_buf = [0u8; 4];

        while stream.read_exact(&mut len_buf).await.is_ok() {
            let len = decode_length(&len_buf);
            if len > MAX_FRAME_BYTES {
                break;
            }

            let mut msg_buf = vec![0u8; len];
            if stream.read_exact(&mut msg_buf).await.is_err() {
                break;
            }

            let request: Request = match serde_json::from_slice(&msg_buf) {
                Ok(r) => r,
                Err(e) => {
                    let response = Response::error(format!("invalid request: {}", e));
                    if let Ok(encoded) = encode_message(&response) {
                        let _ = stream.write_all(&encoded).await;
                    }
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            self.requests_served.fetch_add(1, Ordering::Relaxed);

            if let Ok(encoded) = encode_message(&response)
                && stream.write_all(&encoded).await.is_err()
            {
                break;
            }

            if matches!(response, Response::ShutdownAck) {
                self.shutdown.store(true, Ordering::Relaxed);
                break;
            }
        }
    }

    pub async fn handle_request(&self, request: Request) -> Response {
        match request {
            Request::Ping => Response::Pong,

            Request::Shutdown => {
                self.shutdown.store(true, Ordering::Relaxed);
                Response::ShutdownAck
            }

            Request::Status => {
                let points = self.store.count().await.unwrap_or(0);
                Response::Status(StatusResponse {
                    running: true,
                    collection: self.store.collection().to_string(),
                    points,
                    sessions: self.engine.sessions().session_count().await as u64,
                })
            }

            Request::Chat(req) => self.handle_chat(req).await,
        }
    }

    async fn handle_chat(&self, request: ChatRequest) -> Response {
        if let Err(e) = self.authorize(request.api_key.as_deref()) {
            return Response::error(e.to_string());
        }

        match self.engine.answer(&request.query, &request.session_id).await {
            Ok(ChatOutcome::Answered {
                response,
                source,
                history,
            }) => Response::Chat(ChatReply {
                response,
                source: Some(source),
                history,
            }),

            Ok(ChatOutcome::NothingFound) => Response::Chat(ChatReply {
                response: NOT_FOUND_TEXT.to_string(),
                source: None,
                history: Vec::new(),
            }),

            Err(ChatError::EmptyQuery) => Response::error(ChatError::EmptyQuery.to_string()),

            Err(e) => {
                // Cause stays in the log; callers get the generic reply.
                eprintln!("Error: chat pipeline failed: {}", e);
                Response::error(APOLOGY_TEXT)
            }
        }
    }

    fn authorize(&self, presented: Option<&str>) -> Result<(), ChatError> {
        match (&self.api_key, presented) {
            (Some(expected), Some(key)) if expected == key => Ok(()),
            _ => Err(ChatError::Unauthorized),
        }
    }
}

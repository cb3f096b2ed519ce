//! WebSocket upload sessions.
//!
//! Each connection on `/ws` gets a [`WsSession`] that handles frames strictly
//! in arrival order and answers every upload frame with exactly one JSON text
//! frame:
//! - Text: a JSON `{"label"?, "image"}` object with a base64 image
//! - Binary: the raw image bytes, no label
//! - Close, end of stream, or a transport error end the session
//!
//! Bad frames get an error reply; the connection is never closed because of
//! client input.

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::messages::{ClientFrame, Transport, UploadRequest};
use crate::processing::decode_image;
use crate::server::error::FrameError;
use crate::server::server::IngestService;

/// A WebSocket client session
pub struct WsSession {
    service: Arc<IngestService>,
    /// Session ID for logging
    session_id: String,
}

impl WsSession {
    pub fn new(service: Arc<IngestService>) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();
        info!("[{}] 🔌 WebSocket session opened", session_id);

        Self {
            service,
            session_id,
        }
    }

    /// Handle frames from `incoming` until the client goes away.
    ///
    /// Generic over the socket halves so the loop can be driven by any
    /// stream/sink pair; in production these are the two halves of
    /// [`axum::extract::ws::WebSocket::split`].
    pub async fn run<S, K, E>(self, mut incoming: S, mut outgoing: K)
    where
        S: Stream<Item = Result<Message, E>> + Unpin,
        K: Sink<Message> + Unpin,
        K::Error: Display,
        E: Display,
    {
        while let Some(frame) = incoming.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("[{}] WebSocket error: {}", self.session_id, e);
                    break;
                }
            };

            let reply = match frame {
                Message::Text(text) => Some(self.handle_text(&text)),
                Message::Binary(image) => Some(self.handle_binary(image)),
                Message::Close(_) => {
                    info!("[{}] Client closed connection", self.session_id);
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {
                    debug!("[{}] Ignoring control frame", self.session_id);
                    None
                }
            };

            if let Some(reply) = reply {
                if let Err(e) = outgoing.send(Message::Text(reply)).await {
                    debug!("[{}] WebSocket send failed, closing: {}", self.session_id, e);
                    break;
                }
            }
        }

        info!("[{}] Session ended", self.session_id);
    }

    /// Handle one text frame and return the JSON reply.
    fn handle_text(&self, text: &str) -> String {
        match parse_upload(text) {
            Ok(request) => to_json(&self.service.accept(request, Transport::WebSocketText)),
            Err(e) => {
                warn!("[{}] Rejected text frame: {}", self.session_id, e);
                to_json(&e.to_response())
            }
        }
    }

    fn handle_binary(&self, image: Vec<u8>) -> String {
        let envelope = self
            .service
            .accept(UploadRequest::new(None, image), Transport::WebSocketBinary);
        to_json(&envelope)
    }
}

/// Turn a text frame into an upload, or the error frame to send back.
pub fn parse_upload(text: &str) -> Result<UploadRequest, FrameError> {
    let frame: ClientFrame = serde_json::from_str(text).map_err(|_| FrameError::Malformed)?;

    match frame {
        ClientFrame::Upload { label, image } => {
            let image = decode_image(&image).map_err(|_| FrameError::Malformed)?;
            Ok(UploadRequest::new(label, image))
        }
        ClientFrame::Other(_) => Err(FrameError::ImageNotString),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    // Envelopes and error bodies are plain strings and maps; this cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::IngestConfig;
    use futures::channel::mpsc;
    use serde_json::{json, Value};

    type Inbound = Result<Message, axum::Error>;

    struct Client {
        tx: mpsc::UnboundedSender<Inbound>,
        rx: mpsc::UnboundedReceiver<Message>,
        session: tokio::task::JoinHandle<()>,
    }

    impl Client {
        fn connect() -> Self {
            let service = Arc::new(IngestService::new(&IngestConfig::default()).unwrap());
            let (tx, server_rx) = mpsc::unbounded::<Inbound>();
            let (server_tx, rx) = mpsc::unbounded::<Message>();
            let session = tokio::spawn(WsSession::new(service).run(server_rx, server_tx));
            Self { tx, rx, session }
        }

        async fn send(&mut self, msg: Message) -> Value {
            self.tx.unbounded_send(Ok(msg)).unwrap();
            match self.rx.next().await {
                Some(Message::Text(text)) => serde_json::from_str(&text).unwrap(),
                other => panic!("expected text reply, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_upload_errors() {
        assert_eq!(parse_upload("{not json").unwrap_err(), FrameError::Malformed);
        assert_eq!(parse_upload("42").unwrap_err(), FrameError::Malformed);
        assert_eq!(
            parse_upload(r#"{"image": "@@@"}"#).unwrap_err(),
            FrameError::Malformed
        );
        assert_eq!(
            parse_upload(r#"{"image": 123}"#).unwrap_err(),
            FrameError::ImageNotString
        );
        assert_eq!(
            parse_upload(r#"{"label": "a"}"#).unwrap_err(),
            FrameError::ImageNotString
        );
    }

    #[test]
    fn test_parse_upload_data_uri() {
        let request = parse_upload(r#"{"label": "a", "image": "data:image/jpeg;base64,AQID"}"#).unwrap();
        assert_eq!(request.label.as_deref(), Some("a"));
        assert_eq!(request.image, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_non_string_label_is_dropped() {
        let mut client = Client::connect();

        let reply = client
            .send(Message::Text(json!({"label": 5, "image": "AQID"}).to_string()))
            .await;

        assert_eq!(reply["command"], json!({"action": "ACK"}));
    }

    #[tokio::test]
    async fn test_text_frame_ack_with_label() {
        let mut client = Client::connect();

        let reply = client
            .send(Message::Text(json!({"label": "a", "image": "AQID"}).to_string()))
            .await;

        assert_eq!(reply["command"], json!({"action": "ACK", "labelReceived": "a"}));
        assert!(reply["commandSentAt"].is_string());
    }

    #[tokio::test]
    async fn test_bad_frame_keeps_connection_open() {
        let mut client = Client::connect();

        let reply = client.send(Message::Text(r#"{"image": 123}"#.to_string())).await;
        assert_eq!(
            reply,
            json!({"error": "Invalid message format: 'image' must be base64 string"})
        );

        let reply = client.send(Message::Text("garbage".to_string())).await;
        assert_eq!(reply, json!({"error": "Malformed JSON or base64 decode error"}));

        let reply = client
            .send(Message::Text(json!({"label": "b", "image": "AQID"}).to_string()))
            .await;
        assert_eq!(reply["command"]["labelReceived"], "b");
    }

    #[tokio::test]
    async fn test_binary_frame_ack_without_label() {
        let mut client = Client::connect();

        let reply = client.send(Message::Binary(vec![0xFF, 0xD8])).await;

        assert_eq!(reply["command"], json!({"action": "ACK"}));
    }

    #[tokio::test]
    async fn test_control_frames_ignored_and_order_kept() {
        let mut client = Client::connect();

        client.tx.unbounded_send(Ok(Message::Ping(vec![1]))).unwrap();
        client
            .tx
            .unbounded_send(Ok(Message::Text(json!({"label": "first", "image": "AQID"}).to_string())))
            .unwrap();
        client
            .tx
            .unbounded_send(Ok(Message::Text(json!({"label": "second", "image": "AQID"}).to_string())))
            .unwrap();

        for expected in ["first", "second"] {
            let Some(Message::Text(text)) = client.rx.next().await else {
                panic!("expected text reply");
            };
            let reply: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(reply["command"]["labelReceived"], expected);
        }
    }

    #[tokio::test]
    async fn test_close_frame_ends_session() {
        let mut client = Client::connect();

        client.tx.unbounded_send(Ok(Message::Close(None))).unwrap();
        client.session.await.unwrap();

        // nothing is processed after close
        assert!(client.tx.unbounded_send(Ok(Message::Binary(vec![1]))).is_err());
        assert!(client.rx.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_end_ends_session() {
        let client = Client::connect();

        drop(client.tx);

        client.session.await.unwrap();
    }
}

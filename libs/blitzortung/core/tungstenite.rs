//! WebSocket transport over tokio-tungstenite

use crate::traits::*;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::borrow::Cow;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::{self, WebSocketConfig};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connector for `ws://` and `wss://` endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    type Writer = WsWriter;
    type Reader = WsReader;

    async fn connect(&self, url: &str, read_limit: usize) -> Result<(WsWriter, WsReader)> {
        let mut config = WebSocketConfig::default();
        config.max_message_size = Some(read_limit);
        config.max_frame_size = Some(read_limit);

        let (stream, response) = connect_async_with_config(url, Some(config), false)
            .await
            .map_err(|e| FeedError::Connect(format!("{}: {}", url, e)))?;
        debug!("Handshake with {} completed ({})", url, response.status());

        let (sink, stream) = stream.split();
        Ok((WsWriter { sink }, WsReader { stream }))
    }
}

/// Writing half of a tungstenite connection
pub struct WsWriter {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameWriter for WsWriter {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        self.sink.send(frame_to_message(frame)).await.map_err(map_error)
    }

    async fn close(&mut self) -> Result<()> {
        self.sink.close().await.map_err(map_error)
    }
}

/// Reading half of a tungstenite connection
pub struct WsReader {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl FrameReader for WsReader {
    async fn next_frame(&mut self) -> Option<Result<Frame>> {
        loop {
            match self.stream.next().await? {
                Ok(message) => {
                    if let Some(frame) = message_to_frame(message) {
                        return Some(Ok(frame));
                    }
                }
                Err(e) => return Some(Err(map_error(e))),
            }
        }
    }
}

/// Convert Frame to tungstenite Message
fn frame_to_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text),
        Frame::Binary(data) => Message::Binary(data),
        Frame::Ping(data) => Message::Ping(data),
        Frame::Pong(data) => Message::Pong(data),
        Frame::Close(close) => Message::Close(close.map(|c| protocol::CloseFrame {
            code: CloseCode::from(c.code),
            reason: Cow::Owned(c.reason),
        })),
    }
}

/// Convert tungstenite Message to Frame
///
/// Raw frames only show up when writing, never from a read.
fn message_to_frame(message: Message) -> Option<Frame> {
    match message {
        Message::Text(text) => Some(Frame::Text(text)),
        Message::Binary(data) => Some(Frame::Binary(data)),
        Message::Ping(data) => Some(Frame::Ping(data)),
        Message::Pong(data) => Some(Frame::Pong(data)),
        Message::Close(close) => Some(Frame::Close(close.map(|c| CloseFrame {
            code: u16::from(c.code),
            reason: c.reason.into_owned(),
        }))),
        Message::Frame(_) => None,
    }
}

fn map_error(err: tungstenite::Error) -> FeedError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            FeedError::ConnectionClosed(err.to_string())
        }
        other => FeedError::WebSocket(other.to_string()),
    }
}

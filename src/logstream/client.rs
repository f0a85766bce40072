//! Websocket client for the device serial console (`/wsserial`).
//!
//! The device forwards every serial line as one text message, with no
//! framing beyond that. Frames are decoded in arrival order through a single
//! [`AnsiLineDecoder`] owned by the connection.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::error::LogStreamError;
use crate::ansi::{AnsiLineDecoder, LineRecord};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state shown next to the log view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
        }
    }
}

/// Derive the websocket URL from the device HTTP base URL.
///
/// `http` maps to `ws` and `https` to `wss`; the path replaces any path on
/// the base URL.
pub fn stream_url(base_url: &str, path: &str) -> Result<Url, LogStreamError> {
    let mut url =
        Url::parse(base_url).map_err(|e| LogStreamError::InvalidUrl(format!("{base_url}: {e}")))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(LogStreamError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| LogStreamError::InvalidUrl(format!("cannot use scheme {scheme}")))?;
    url.set_path(path);
    url.set_query(None);
    Ok(url)
}

/// An open log stream.
pub struct LogStreamClient {
    sink: SplitSink<WsStream, WsMessage>,
    stream: SplitStream<WsStream>,
    decoder: AnsiLineDecoder,
    state: ConnectionState,
}

impl LogStreamClient {
    /// Open the websocket at `url`.
    pub async fn connect(url: &Url) -> Result<Self, LogStreamError> {
        tracing::debug!(url = %url, "Connecting to log stream");
        let (ws, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| LogStreamError::Connect(e.to_string()))?;
        let (sink, stream) = ws.split();

        tracing::info!(url = %url, "Log stream connected");
        Ok(Self {
            sink,
            stream,
            decoder: AnsiLineDecoder::new(),
            state: ConnectionState::Connected,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Wait for the next log line.
    ///
    /// Returns `None` once the stream is closed or failed; the state tells
    /// which. Binary frames are decoded lossily, control frames skipped.
    pub async fn next_line(&mut self) -> Option<LineRecord> {
        if self.state != ConnectionState::Connected {
            return None;
        }

        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    return Some(self.decoder.decode(text.as_str()));
                }
                Some(Ok(WsMessage::Binary(bytes))) => {
                    let text = String::from_utf8_lossy(&bytes);
                    return Some(self.decoder.decode(&text));
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    tracing::info!("Log stream closed by device");
                    self.state = ConnectionState::Disconnected;
                    return None;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Log stream read error");
                    self.state = ConnectionState::Error;
                    return None;
                }
            }
        }
    }

    /// Send one line to the device console. Empty input is not sent.
    pub async fn send_line(&mut self, text: &str) -> Result<(), LogStreamError> {
        if text.is_empty() {
            return Ok(());
        }
        if self.state != ConnectionState::Connected {
            return Err(LogStreamError::NotConnected);
        }

        self.sink
            .send(WsMessage::Text(text.into()))
            .await
            .map_err(|e| LogStreamError::Send(e.to_string()))
    }

    /// Close the connection politely.
    pub async fn close(mut self) {
        let _ = self.sink.send(WsMessage::Close(None)).await;
        self.state = ConnectionState::Disconnected;
    }
}

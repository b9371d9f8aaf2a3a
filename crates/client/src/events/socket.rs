//! Socket.IO (v4) event channel over a WebSocket.
//!
//! Only the subset the change-notification flow needs is spoken: the
//! engine.io handshake, a namespace connect carrying the auth payload,
//! heartbeats, and plain (non-binary) events in both directions.

use std::sync::Arc;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::{AuthPayload, ChannelState, EventChannel, EventError, Listeners};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

const PONG: &str = "3";
const DISCONNECT: &str = "41";

/// One decoded engine.io / socket.io frame
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Packet {
    Open(Value),
    Close,
    Ping,
    Pong,
    Connect(Value),
    ConnectError(Value),
    Disconnect,
    Event { name: String, payload: Value },
    Other(String),
}

pub(crate) fn decode_packet(frame: &str) -> Result<Packet, EventError> {
    let mut chars = frame.chars();
    let Some(kind) = chars.next() else {
        return Err(EventError::Protocol("empty frame".to_string()));
    };
    let body = chars.as_str();

    match kind {
        '0' => Ok(Packet::Open(json_or_null(body)?)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(body),
        _ => Ok(Packet::Other(frame.to_string())),
    }
}

fn decode_message(body: &str) -> Result<Packet, EventError> {
    let mut chars = body.chars();
    let Some(kind) = chars.next() else {
        return Ok(Packet::Other(format!("4{}", body)));
    };
    let rest = strip_namespace(chars.as_str());

    match kind {
        '0' => Ok(Packet::Connect(json_or_null(rest)?)),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(rest),
        '4' => Ok(Packet::ConnectError(json_or_null(rest)?)),
        _ => Ok(Packet::Other(format!("4{}", body))),
    }
}

fn decode_event(rest: &str) -> Result<Packet, EventError> {
    // acknowledgement id, if any, precedes the argument array
    let args = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let Value::Array(mut args) = serde_json::from_str(args)? else {
        return Err(EventError::Protocol(format!("event is not an array: {}", rest)));
    };
    if args.is_empty() {
        return Err(EventError::Protocol("event without a name".to_string()));
    }
    let Value::String(name) = args.remove(0) else {
        return Err(EventError::Protocol(format!("event name is not a string: {}", rest)));
    };
    let payload = match args.len() {
        0 => Value::Null,
        1 => args.remove(0),
        _ => Value::Array(args),
    };
    Ok(Packet::Event { name, payload })
}

fn strip_namespace(rest: &str) -> &str {
    if !rest.starts_with('/') {
        return rest;
    }
    match rest.find(',') {
        Some(index) => &rest[index + 1..],
        None => "",
    }
}

fn json_or_null(body: &str) -> Result<Value, EventError> {
    if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}

pub(crate) fn encode_connect(auth: &AuthPayload) -> Result<String, EventError> {
    Ok(format!("40{}", serde_json::to_string(auth)?))
}

pub(crate) fn encode_event(event: &str, payload: &Value) -> Result<String, EventError> {
    let frame = match payload {
        Value::Null => serde_json::to_string(&[event])?,
        payload => serde_json::to_string(&serde_json::json!([event, payload]))?,
    };
    Ok(format!("42{}", frame))
}

struct Connection {
    writer: Arc<Mutex<WsSink>>,
    reader: JoinHandle<()>,
}

/// [`EventChannel`] backed by a Socket.IO server.
pub struct SocketChannel {
    url: Url,
    listeners: Arc<Listeners>,
    state: Arc<RwLock<ChannelState>>,
    connection: Mutex<Option<Connection>>,
}

impl SocketChannel {
    /// `url` is the full websocket endpoint, see
    /// [`ClientConfig::socket_url`](crate::config::ClientConfig::socket_url).
    pub fn new(url: Url) -> Self {
        Self {
            url,
            listeners: Arc::new(Listeners::default()),
            state: Arc::new(RwLock::new(ChannelState::Disconnected)),
            connection: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for SocketChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketChannel")
            .field("url", &self.url.as_str())
            .field("state", &*self.state.read())
            .field("listeners", &self.listeners)
            .finish()
    }
}

async fn next_packet(reader: &mut SplitStream<WsStream>) -> Result<Packet, EventError> {
    loop {
        match reader.next().await {
            Some(Ok(Message::Text(text))) => return decode_packet(&text),
            Some(Ok(Message::Close(_))) | None => return Err(EventError::Closed),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

/// Marks the channel disconnected when the reader ends, however it ends
struct DisconnectOnDrop(Arc<RwLock<ChannelState>>);

impl Drop for DisconnectOnDrop {
    fn drop(&mut self) {
        *self.0.write() = ChannelState::Disconnected;
        tracing::info!("event channel disconnected");
    }
}

async fn read_loop(
    mut reader: SplitStream<WsStream>,
    writer: Arc<Mutex<WsSink>>,
    listeners: Arc<Listeners>,
    state: Arc<RwLock<ChannelState>>,
) {
    // listeners run inline here, a panicking one must still leave the state right
    let _disconnect = DisconnectOnDrop(state);

    while let Some(message) = reader.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("event channel read failed: {}", e);
                break;
            }
        };

        match decode_packet(&text) {
            Ok(Packet::Ping) => {
                if let Err(e) = writer.lock().await.send(Message::Text(PONG.into())).await {
                    tracing::warn!("event channel heartbeat failed: {}", e);
                    break;
                }
            }
            Ok(Packet::Event { name, payload }) => {
                let delivered = listeners.dispatch(&name, &payload);
                tracing::debug!(event = %name, listeners = delivered, "event received");
            }
            Ok(Packet::Disconnect) | Ok(Packet::Close) => {
                tracing::info!("event channel closed by server");
                break;
            }
            Ok(other) => tracing::debug!(packet = ?other, "ignoring packet"),
            Err(e) => tracing::warn!("dropping undecodable frame: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl EventChannel for SocketChannel {
    async fn connect(&self, auth: AuthPayload) -> Result<(), EventError> {
        let mut connection = self.connection.lock().await;
        if connection.is_some() && self.state() == ChannelState::Connected {
            return Ok(());
        }
        if let Some(stale) = connection.take() {
            stale.reader.abort();
            // wait out its state update so it cannot land after ours
            let _ = stale.reader.await;
        }

        let (ws, _response) = connect_async(self.url.as_str()).await?;
        let (mut writer, mut reader) = ws.split();

        match next_packet(&mut reader).await? {
            Packet::Open(handshake) => tracing::debug!(%handshake, "engine.io handshake"),
            other => {
                return Err(EventError::Protocol(format!(
                    "expected open packet, got {:?}",
                    other
                )))
            }
        }

        writer
            .send(Message::Text(encode_connect(&auth)?.into()))
            .await?;

        loop {
            match next_packet(&mut reader).await? {
                Packet::Connect(_) => break,
                Packet::ConnectError(reason) => {
                    let reason = reason
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| reason.to_string());
                    return Err(EventError::Rejected(reason));
                }
                Packet::Ping => writer.send(Message::Text(PONG.into())).await?,
                Packet::Close | Packet::Disconnect => return Err(EventError::Closed),
                other => tracing::debug!(packet = ?other, "ignoring packet before connect ack"),
            }
        }

        let writer = Arc::new(Mutex::new(writer));
        *self.state.write() = ChannelState::Connected;
        let reader = tokio::spawn(read_loop(
            reader,
            writer.clone(),
            self.listeners.clone(),
            self.state.clone(),
        ));
        *connection = Some(Connection { writer, reader });

        tracing::info!(url = %self.url, "event channel connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), EventError> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(());
        };

        {
            let mut writer = connection.writer.lock().await;
            // the transport may already be gone
            let _ = writer.send(Message::Text(DISCONNECT.into())).await;
            let _ = writer.close().await;
        }
        connection.reader.abort();
        let _ = connection.reader.await;
        *self.state.write() = ChannelState::Disconnected;

        tracing::info!(url = %self.url, "event channel disconnected by client");
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), EventError> {
        let writer = match self.connection.lock().await.as_ref() {
            Some(connection) if self.state() == ChannelState::Connected => {
                connection.writer.clone()
            }
            _ => return Err(EventError::NotConnected),
        };

        let frame = encode_event(event, &payload)?;
        writer.lock().await.send(Message::Text(frame.into())).await?;
        tracing::debug!(%event, "event emitted");
        Ok(())
    }

    fn state(&self) -> ChannelState {
        *self.state.read()
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_engine_packets() {
        let open = decode_packet(r#"0{"sid":"abc","pingInterval":25000}"#).unwrap();
        assert_eq!(open, Packet::Open(json!({"sid": "abc", "pingInterval": 25000})));
        assert_eq!(decode_packet("2").unwrap(), Packet::Ping);
        assert_eq!(decode_packet("3").unwrap(), Packet::Pong);
        assert_eq!(decode_packet("1").unwrap(), Packet::Close);
        assert!(decode_packet("").is_err());
    }

    #[test]
    fn test_decode_connect_ack_and_error() {
        assert_eq!(
            decode_packet(r#"40{"sid":"xyz"}"#).unwrap(),
            Packet::Connect(json!({"sid": "xyz"}))
        );
        assert_eq!(
            decode_packet(r#"44{"message":"invalid token"}"#).unwrap(),
            Packet::ConnectError(json!({"message": "invalid token"}))
        );
        assert_eq!(decode_packet("41").unwrap(), Packet::Disconnect);
    }

    #[test]
    fn test_decode_event_without_payload() {
        assert_eq!(
            decode_packet(r#"42["directory:change"]"#).unwrap(),
            Packet::Event {
                name: "directory:change".to_string(),
                payload: Value::Null
            }
        );
    }

    #[test]
    fn test_decode_event_with_namespace_and_ack_id() {
        assert_eq!(
            decode_packet(r#"42/files,7["directory:change",{"id":"d-1"}]"#).unwrap(),
            Packet::Event {
                name: "directory:change".to_string(),
                payload: json!({"id": "d-1"})
            }
        );
    }

    #[test]
    fn test_decode_event_with_many_args() {
        let Packet::Event { payload, .. } = decode_packet(r#"42["e",1,2]"#).unwrap() else {
            panic!("expected event");
        };
        assert_eq!(payload, json!([1, 2]));
    }

    #[test]
    fn test_decode_malformed_events() {
        assert!(decode_packet(r#"42{"not":"array"}"#).is_err());
        assert!(decode_packet("42[]").is_err());
        assert!(decode_packet("42[1]").is_err());
        assert!(decode_packet("42[").is_err());
    }

    #[test]
    fn test_encode() {
        let auth = AuthPayload {
            token: "k.0.u.h.e".to_string(),
        };
        assert_eq!(encode_connect(&auth).unwrap(), r#"40{"token":"k.0.u.h.e"}"#);
        assert_eq!(
            encode_event("directory:initialize", &json!({"directoryId": "d-1"})).unwrap(),
            r#"42["directory:initialize",{"directoryId":"d-1"}]"#
        );
        assert_eq!(encode_event("ping", &Value::Null).unwrap(), r#"42["ping"]"#);
    }

    #[tokio::test]
    async fn test_emit_requires_connection() {
        let channel = SocketChannel::new(Url::parse("ws://localhost:1/socket.io/").unwrap());
        assert_eq!(channel.state(), ChannelState::Disconnected);
        let err = channel.emit("x", Value::Null).await.unwrap_err();
        assert!(matches!(err, EventError::NotConnected));
        // disconnecting while disconnected is a no-op
        channel.disconnect().await.unwrap();
    }
}

//! Change notifications.
//!
//! The server pushes an unstructured `directory:change` signal whenever
//! something a session watches changes. Nothing is read from the signal
//! itself; [`ChangeBridge`] turns each one into fresh API reads and hands the
//! results to caller callbacks.
//!
//! The transport sits behind [`EventChannel`] so the bridge does not care
//! what carries the signals. [`SocketChannel`] is the production transport.

mod bridge;
mod socket;

pub use bridge::{BridgeError, ChangeBridge, Subscription};
pub use socket::SocketChannel;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Inbound signal: something in a watched directory changed
pub const DIRECTORY_CHANGE: &str = "directory:change";
/// Outbound: start watching a directory
pub const DIRECTORY_INITIALIZE: &str = "directory:initialize";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connected,
}

/// Sent when the channel connects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event channel is not connected")]
    NotConnected,
    #[error("event channel closed")]
    Closed,
    #[error("connection rejected by server: {0}")]
    Rejected(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for EventError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listener callback, run on the channel's reader with the event payload
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Event name -> listeners, in registration order.
#[derive(Default)]
pub struct Listeners {
    inner: RwLock<HashMap<String, Vec<(ListenerId, Handler)>>>,
}

impl Listeners {
    pub fn add(&self, event: &str, handler: Handler) -> ListenerId {
        let id = ListenerId::new();
        self.inner
            .write()
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    pub fn remove(&self, event: &str, id: ListenerId) -> bool {
        let mut inner = self.inner.write();
        let Some(handlers) = inner.get_mut(event) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        before != handlers.len()
    }

    pub fn remove_all(&self, event: &str) -> usize {
        self.inner
            .write()
            .remove(event)
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }

    pub fn count(&self, event: &str) -> usize {
        self.inner.read().get(event).map(Vec::len).unwrap_or(0)
    }

    /// Run every listener for `event`, returning how many ran.
    ///
    /// Handlers are called outside the lock, so a handler may register or
    /// remove listeners.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let handlers: Vec<Handler> = match self.inner.read().get(event) {
            Some(handlers) => handlers.iter().map(|(_, h)| h.clone()).collect(),
            None => return 0,
        };
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<String, usize> = self
            .inner
            .read()
            .iter()
            .map(|(event, handlers)| (event.clone(), handlers.len()))
            .collect();
        f.debug_struct("Listeners").field("counts", &counts).finish()
    }
}

/// A persistent, bidirectional event connection.
///
/// `connect` and `disconnect` are idempotent but should not race each other.
/// A transport-level drop moves the channel back to
/// [`ChannelState::Disconnected`]; reconnecting is up to the implementation.
#[async_trait::async_trait]
pub trait EventChannel: Send + Sync + 'static {
    async fn connect(&self, auth: AuthPayload) -> Result<(), EventError>;

    async fn disconnect(&self) -> Result<(), EventError>;

    async fn emit(&self, event: &str, payload: Value) -> Result<(), EventError>;

    fn state(&self) -> ChannelState;

    fn listeners(&self) -> &Listeners;

    fn on(&self, event: &str, handler: Handler) -> ListenerId {
        self.listeners().add(event, handler)
    }

    fn off(&self, event: &str, id: ListenerId) -> bool {
        self.listeners().remove(event, id)
    }

    /// Remove every listener for `event`
    fn off_all(&self, event: &str) -> usize {
        self.listeners().remove_all(event)
    }
}

//! Shared test utilities for client integration tests
#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use strata_client::events::{
    AuthPayload, ChannelState, EventChannel, EventError, Listeners, DIRECTORY_CHANGE,
};
use strata_client::{ApiClient, ClientConfig};

/// Key granting every operation
pub const UNRESTRICTED_KEY: &str = "key-1.0.user-1.hash.edge-1";
/// READ_FILE | UPLOAD_FILE
pub const UPLOAD_ONLY_KEY: &str = "key-2.3.user-1.hash.edge-2";
/// READ_DIRECTORY only
pub const READ_DIRECTORY_KEY: &str = "key-3.8.user-1.hash.edge-3";

/// Client pointed at a mock server
pub fn client(server: &mockito::ServerGuard, key: &str) -> ApiClient {
    ApiClient::new(key, &ClientConfig::with_host(server.url())).unwrap()
}

pub fn file_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "text/plain",
        "size": 5,
        "userId": "user-1",
        "isDeleted": false,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z",
        "directoryId": "d-root",
        "cid": "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku",
        "storageClasses": ["hot"]
    })
}

pub fn directory_json(id: &str, name: &str, parent: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "parentDirectoryId": parent,
        "userId": "user-1",
        "isDeleted": false,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z",
        "storageClass": "hot"
    })
}

pub fn listing_json(directories: Vec<Value>, files: Vec<Value>) -> String {
    json!({ "directories": directories, "files": files }).to_string()
}

/// In-memory channel: records what the client sends and lets a test fire
/// inbound events by hand.
#[derive(Default)]
pub struct MemoryChannel {
    listeners: Listeners,
    state: Mutex<ChannelState>,
    pub auth: Mutex<Option<AuthPayload>>,
    pub emitted: Mutex<Vec<(String, Value)>>,
}

impl MemoryChannel {
    /// Fire one `directory:change`, returning how many listeners ran
    pub fn signal_change(&self) -> usize {
        self.listeners.dispatch(DIRECTORY_CHANGE, &Value::Null)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count(DIRECTORY_CHANGE)
    }

    /// Simulate the transport dropping underneath the client
    pub fn drop_transport(&self) {
        *self.state.lock() = ChannelState::Disconnected;
    }
}

#[async_trait::async_trait]
impl EventChannel for MemoryChannel {
    async fn connect(&self, auth: AuthPayload) -> Result<(), EventError> {
        *self.auth.lock() = Some(auth);
        *self.state.lock() = ChannelState::Connected;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), EventError> {
        *self.state.lock() = ChannelState::Disconnected;
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<(), EventError> {
        if *self.state.lock() != ChannelState::Connected {
            return Err(EventError::NotConnected);
        }
        self.emitted.lock().push((event.to_string(), payload));
        Ok(())
    }

    fn state(&self) -> ChannelState {
        *self.state.lock()
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }
}

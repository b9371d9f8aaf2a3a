// Resource client (HTTP surface, gated per operation)
pub mod api;
// Client configuration (hosts, deployment modes)
pub mod config;
// Change notifications (event channel + refresh bridge)
pub mod events;

// CLI config file
pub mod state;

// Re-exports for consumers
pub use api::client::{ApiClient, ApiError, ApiRequest};
pub use config::{ClientConfig, Deployment};
pub use events::{
    BridgeError, ChangeBridge, ChannelState, EventChannel, EventError, SocketChannel,
    Subscription,
};
pub use state::{AppConfig, AppState, StateError};

pub use common::prelude::*;

use std::future::Future;
use std::sync::Arc;

use common::prelude::{authorize, DirectoryListing, Operation};
use serde_json::{json, Value};
use tokio::runtime::Handle;

use super::{
    AuthPayload, ChannelState, EventChannel, EventError, Handler, ListenerId, DIRECTORY_CHANGE,
    DIRECTORY_INITIALIZE,
};
use crate::api::client::{ApiClient, ApiError};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("event channel error: {0}")]
    Event(#[from] EventError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("change bridge must be created inside a tokio runtime")]
    NoRuntime,
}

/// Handle to one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    event: &'static str,
    id: ListenerId,
}

impl Subscription {
    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

/// Turns change signals into fresh API reads.
///
/// Every `directory:change` signal starts one independent refresh per
/// subscription, each on its own task. Refreshes are never coalesced or
/// cancelled, so two signals in quick succession race: callbacks fire once
/// per signal, but a later callback may carry older data than an earlier
/// one. Refresh failures are handed to the callback as `Err`.
pub struct ChangeBridge<C: EventChannel> {
    client: ApiClient,
    channel: Arc<C>,
    runtime: Handle,
}

impl<C: EventChannel> ChangeBridge<C> {
    pub fn new(client: ApiClient, channel: C) -> Result<Self, BridgeError> {
        Self::with_shared(client, Arc::new(channel))
    }

    /// Build over a channel the caller keeps a handle to
    pub fn with_shared(client: ApiClient, channel: Arc<C>) -> Result<Self, BridgeError> {
        let runtime = Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;
        Ok(Self {
            client,
            channel,
            runtime,
        })
    }

    /// Open the channel, authenticating with the raw API key
    pub async fn connect(&self) -> Result<(), BridgeError> {
        let auth = AuthPayload {
            token: self.client.api_key().as_str().to_string(),
        };
        self.channel.connect(auth).await?;
        Ok(())
    }

    pub async fn disconnect(&self) -> Result<(), BridgeError> {
        self.channel.disconnect().await?;
        Ok(())
    }

    pub fn state(&self) -> ChannelState {
        self.channel.state()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn channel(&self) -> &Arc<C> {
        &self.channel
    }

    /// Run `callback` on every change signal, with whatever payload came along
    pub fn on_directory_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.channel.on(DIRECTORY_CHANGE, Arc::new(callback));
        Subscription {
            event: DIRECTORY_CHANGE,
            id,
        }
    }

    /// Re-read the total stored size on every change signal
    pub fn on_total_size_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Result<u128, ApiError>) + Send + Sync + 'static,
    {
        self.refresh_on_change(
            |client: ApiClient| async move { client.get_total_size().await },
            callback,
        )
    }

    /// Start watching directory `id` and re-read it on every change signal.
    ///
    /// The read is gated up front: without `READ_DIRECTORY` nothing is
    /// emitted or registered.
    pub async fn on_read_directory_event<F>(
        &self,
        id: &str,
        callback: F,
    ) -> Result<Subscription, BridgeError>
    where
        F: Fn(Result<DirectoryListing, ApiError>) + Send + Sync + 'static,
    {
        authorize(self.client.scope(), Operation::ReadDirectory).map_err(ApiError::from)?;

        self.channel
            .emit(DIRECTORY_INITIALIZE, json!({ "directoryId": id }))
            .await?;
        tracing::debug!(directory = %id, "watching directory");

        let id = id.to_string();
        Ok(self.refresh_on_change(
            move |client: ApiClient| {
                let id = id.clone();
                async move { client.read_directory(&id).await }
            },
            callback,
        ))
    }

    /// Re-read the directory at `path` on every change signal
    pub fn on_read_directory_segment_change<F>(
        &self,
        path: &str,
        callback: F,
    ) -> Result<Subscription, BridgeError>
    where
        F: Fn(Result<DirectoryListing, ApiError>) + Send + Sync + 'static,
    {
        authorize(self.client.scope(), Operation::ReadDirectoryBySegment)
            .map_err(ApiError::from)?;

        let path = path.to_string();
        Ok(self.refresh_on_change(
            move |client: ApiClient| {
                let path = path.clone();
                async move { client.read_directory_by_segment(&path).await }
            },
            callback,
        ))
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.channel.off(subscription.event, subscription.id)
    }

    /// Drop every directory-change listener, not only the bridge's own.
    /// Returns how many were removed.
    pub fn disconnect_read_directory_event(&self) -> usize {
        let removed = self.channel.off_all(DIRECTORY_CHANGE);
        tracing::debug!(removed, "removed directory change listeners");
        removed
    }

    fn refresh_on_change<T, R, Fut, F>(&self, refresh: R, callback: F) -> Subscription
    where
        T: Send + 'static,
        R: Fn(ApiClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        F: Fn(Result<T, ApiError>) + Send + Sync + 'static,
    {
        let client = self.client.clone();
        let runtime = self.runtime.clone();
        let callback = Arc::new(callback);

        let handler: Handler = Arc::new(move |_payload: &Value| {
            let pending = refresh(client.clone());
            let callback = callback.clone();
            runtime.spawn(async move {
                let result = pending.await;
                if let Err(e) = &result {
                    tracing::warn!("refresh after change failed: {}", e);
                }
                callback(result);
            });
        });

        let id = self.channel.on(DIRECTORY_CHANGE, handler);
        Subscription {
            event: DIRECTORY_CHANGE,
            id,
        }
    }
}

impl<C: EventChannel> std::fmt::Debug for ChangeBridge<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBridge")
            .field("remote", &self.client.base_url().as_str())
            .field("state", &self.channel.state())
            .field("listeners", self.channel.listeners())
            .finish()
    }
}

//! Change bridge over an in-memory event channel

mod common;

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;
use strata_client::events::{DIRECTORY_CHANGE, DIRECTORY_INITIALIZE};
use strata_client::{ApiError, BridgeError, ChangeBridge, ChannelState, EventError};
use tokio::sync::mpsc;
use tokio::time::timeout;

use common::{
    client, directory_json, listing_json, MemoryChannel, READ_DIRECTORY_KEY, UNRESTRICTED_KEY,
    UPLOAD_ONLY_KEY,
};

async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a refresh")
        .expect("callback channel closed")
}

#[tokio::test]
async fn test_connect_authenticates_with_raw_key() {
    let server = Server::new_async().await;
    let bridge = ChangeBridge::new(client(&server, UNRESTRICTED_KEY), MemoryChannel::default())
        .unwrap();
    assert_eq!(bridge.state(), ChannelState::Disconnected);

    bridge.connect().await.unwrap();
    assert_eq!(bridge.state(), ChannelState::Connected);
    assert_eq!(
        bridge.channel().auth.lock().as_ref().map(|auth| auth.token.clone()),
        Some(UNRESTRICTED_KEY.to_string())
    );

    bridge.disconnect().await.unwrap();
    assert_eq!(bridge.state(), ChannelState::Disconnected);
}

#[tokio::test]
async fn test_every_signal_triggers_a_refresh() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/directory/d-1")
        .with_status(200)
        .with_body(listing_json(vec![directory_json("d-2", "child", Some("d-1"))], vec![]))
        .expect(2)
        .create_async()
        .await;

    let bridge = ChangeBridge::new(client(&server, READ_DIRECTORY_KEY), MemoryChannel::default())
        .unwrap();
    bridge.connect().await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge
        .on_read_directory_event("d-1", move |result| {
            let _ = tx.send(result);
        })
        .await
        .unwrap();

    assert_eq!(
        bridge.channel().emitted.lock().as_slice(),
        &[(DIRECTORY_INITIALIZE.to_string(), json!({ "directoryId": "d-1" }))]
    );

    // both fire before either refresh can finish
    assert_eq!(bridge.channel().signal_change(), 1);
    assert_eq!(bridge.channel().signal_change(), 1);

    for _ in 0..2 {
        let listing = recv(&mut rx).await.unwrap();
        assert_eq!(listing.directories[0].id, "d-2");
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_total_size_refresh() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/total-size")
        .with_status(200)
        .with_body(r#"{"totalSize": "18446744073709551616"}"#)
        .create_async()
        .await;

    let bridge = ChangeBridge::new(client(&server, UPLOAD_ONLY_KEY), MemoryChannel::default())
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.on_total_size_change(move |result| {
        let _ = tx.send(result);
    });

    bridge.channel().signal_change();
    assert_eq!(recv(&mut rx).await.unwrap(), u64::MAX as u128 + 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_segment_watch_refreshes_by_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/directory")
        .match_query(Matcher::Exact("segment=docs&segment=2024".into()))
        .with_status(200)
        .with_body(listing_json(vec![], vec![]))
        .create_async()
        .await;

    let bridge = ChangeBridge::new(client(&server, READ_DIRECTORY_KEY), MemoryChannel::default())
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge
        .on_read_directory_segment_change("/docs/2024/", move |result| {
            let _ = tx.send(result);
        })
        .unwrap();

    // path watches do not announce themselves
    assert!(bridge.channel().emitted.lock().is_empty());

    bridge.channel().signal_change();
    assert!(recv(&mut rx).await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_refresh_failure_reaches_callback() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/directory/d-1")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let bridge = ChangeBridge::new(client(&server, READ_DIRECTORY_KEY), MemoryChannel::default())
        .unwrap();
    bridge.connect().await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge
        .on_read_directory_event("d-1", move |result| {
            let _ = tx.send(result);
        })
        .await
        .unwrap();

    bridge.channel().signal_change();
    let err = recv(&mut rx).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(status, _) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_watch_requires_connected_channel() {
    let server = Server::new_async().await;
    let bridge = ChangeBridge::new(client(&server, READ_DIRECTORY_KEY), MemoryChannel::default())
        .unwrap();

    let err = bridge
        .on_read_directory_event("d-1", |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Event(EventError::NotConnected)));
    assert_eq!(bridge.channel().listener_count(), 0);

    bridge.connect().await.unwrap();
    bridge.channel().drop_transport();
    assert_eq!(bridge.state(), ChannelState::Disconnected);
    assert!(bridge.on_read_directory_event("d-1", |_| {}).await.is_err());
}

#[tokio::test]
async fn test_disconnect_read_directory_event_removes_every_listener() {
    let server = Server::new_async().await;
    let channel = Arc::new(MemoryChannel::default());
    let bridge =
        ChangeBridge::with_shared(client(&server, UNRESTRICTED_KEY), channel.clone()).unwrap();
    bridge.connect().await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let plain = bridge.on_directory_change(move |_| {
        let _ = tx.send(());
    });
    bridge.on_total_size_change(|_| {});
    bridge
        .on_read_directory_event("d-1", |_| {})
        .await
        .unwrap();
    assert_eq!(channel.listener_count(), 3);

    // plain listeners run inline, no refresh involved
    channel.signal_change();
    recv(&mut rx).await;

    assert_eq!(bridge.disconnect_read_directory_event(), 3);
    assert_eq!(channel.signal_change(), 0);
    assert!(!bridge.unsubscribe(&plain));
    assert_eq!(plain.event(), DIRECTORY_CHANGE);
}

#[tokio::test]
async fn test_unsubscribe_one_listener() {
    let server = Server::new_async().await;
    let bridge = ChangeBridge::new(client(&server, UNRESTRICTED_KEY), MemoryChannel::default())
        .unwrap();

    let first = bridge.on_directory_change(|_| {});
    let _second = bridge.on_directory_change(|_| {});

    assert!(bridge.unsubscribe(&first));
    assert_eq!(bridge.channel().listener_count(), 1);
    assert_eq!(bridge.channel().signal_change(), 1);
}

//! Control API Integration Tests
//!
//! Exercises `HttpControlApi` against the mock control server.


use integration_harness::{MockState, spawn_mock_server};
use std::sync::atomic::Ordering;
use vpndash_client::{ApiError, ControlApi};

/// Test: status reflects server state
#[tokio::test]
async fn test_status_round_trip() {
    let server = spawn_mock_server().await;
    let api = server.api();

    let status = api.status().await.expect("status failed");
    assert!(!status.connected);
    assert_eq!(status.status.as_deref(), Some("disconnected"));
    assert_eq!(status.last_updated, "2024-05-01 12:00:00");

    server.state.connected.store(true, Ordering::SeqCst);
    let status = api.status().await.expect("status failed");
    assert!(status.connected);
}

/// Test: connect and disconnect flip the server flag
#[tokio::test]
async fn test_connect_then_disconnect() {
    let server = spawn_mock_server().await;
    let api = server.api();

    let resp = api.connect().await.expect("connect failed");
    assert!(resp.success);
    assert_eq!(resp.message, "VPN connection started");
    assert!(server.state.connected.load(Ordering::SeqCst));

    let resp = api.disconnect().await.expect("disconnect failed");
    assert!(resp.success);
    assert!(!server.state.connected.load(Ordering::SeqCst));
}

/// Test: a 500 with a JSON body is an application refusal, not an error
#[tokio::test]
async fn test_refusal_body_is_decoded() {
    let server = spawn_mock_server().await;
    server.state.refuse("busy");

    let resp = server.api().disconnect().await.expect("refusal should decode");
    assert!(!resp.success);
    assert_eq!(resp.message, "busy");
}

/// Test: a non-JSON body is reported with route and HTTP status
#[tokio::test]
async fn test_garbled_status_is_decode_error() {
    let server = spawn_mock_server().await;
    server.state.garble_status.store(true, Ordering::SeqCst);

    match server.api().status().await {
        Err(ApiError::Decode { status, .. }) => assert_eq!(status, 502),
        other => panic!("expected decode error, got {:?}", other),
    }
}

/// Test: keep-alive reaches the server
#[tokio::test]
async fn test_keep_alive_is_posted() {
    let server = spawn_mock_server().await;
    server.api().keep_alive().await.expect("keep-alive failed");
    assert_eq!(MockState::count(&server.state.keep_alive_calls), 1);
}

/// Test: nothing listening is a transport error
#[tokio::test]
async fn test_stopped_server_is_transport_error() {
    let server = spawn_mock_server().await;
    let api = server.api();
    drop(server);
    // Give the aborted listener a moment to close
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let err = api.connect().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}

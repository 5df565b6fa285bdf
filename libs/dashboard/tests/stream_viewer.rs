//! Integration tests for the livestream viewer against a mock SSE endpoint

mod common;

use common::{wait_until, MockApiServer, Reply};
use dashboard::StreamViewer;
use serde_json::json;
use sse_client::ConnectionState;

const STREAM: &str = "/api/livestream/stream";

#[tokio::test]
async fn test_valid_events_appended_in_order() {
    let server = MockApiServer::start(vec![(
        STREAM,
        vec![Reply::stream(
            &[
                "data: {\"Symbol\":\"AAPL\",\"Rvol\":1.5}\n\n",
                ": ping\n\n",
                "data: data: {\"Symbol\":\"TSLA\",\"Rvol\":2}\n\n",
                "data: [1, 2, 3]\n\n",
            ],
            true,
        )],
    )])
    .await;

    let config = server.dashboard_config();
    let viewer = StreamViewer::new(&config.api, &config.stream);
    let state = viewer.state();
    let stream = viewer.mount().await.unwrap();

    wait_until(|| state.read().len() == 3).await;
    wait_until(|| stream.connection_state() == ConnectionState::Connected).await;

    {
        let state = state.read();
        let payloads: Vec<_> = state.events().map(|e| e.payload.clone()).collect();
        assert_eq!(
            payloads,
            vec![
                json!({"Symbol": "AAPL", "Rvol": 1.5}),
                json!({"Symbol": "TSLA", "Rvol": 2}),
                json!([1, 2, 3]),
            ]
        );
        let seqs: Vec<u64> = state.events().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert!(state.is_connected());
    }

    stream.unmount().await;
    assert!(!state.read().is_connected());
}

#[tokio::test]
async fn test_malformed_payload_skipped_without_closing() {
    let server = MockApiServer::start(vec![(
        STREAM,
        vec![Reply::stream(
            &[
                "data: {\"a\":1}\n\n",
                "data: {broken\n\n",
                "data: {\"a\":2}\n\n",
            ],
            true,
        )],
    )])
    .await;

    let config = server.dashboard_config();
    let viewer = StreamViewer::new(&config.api, &config.stream);
    let state = viewer.state();
    let stream = viewer.mount().await.unwrap();

    wait_until(|| state.read().len() == 2).await;
    assert_eq!(state.read().rejected_count(), 1);
    assert!(!stream.is_finished());
    assert_eq!(server.hits(STREAM), 1);

    stream.unmount().await;
}

#[tokio::test]
async fn test_ring_buffer_bounds_memory() {
    let frames: Vec<String> = (0..6).map(|i| format!("data: {{\"n\":{}}}\n\n", i)).collect();
    let frame_refs: Vec<&str> = frames.iter().map(String::as_str).collect();
    let server =
        MockApiServer::start(vec![(STREAM, vec![Reply::stream(&frame_refs, true)])]).await;

    let mut config = server.dashboard_config();
    config.stream.max_events = 4;
    let viewer = StreamViewer::new(&config.api, &config.stream);
    let state = viewer.state();
    let stream = viewer.mount().await.unwrap();

    wait_until(|| state.read().accepted_count() == 6).await;
    {
        let state = state.read();
        assert_eq!(state.len(), 4);
        assert_eq!(state.evicted_count(), 2);
        assert_eq!(state.events().next().map(|e| e.payload.clone()), Some(json!({"n": 2})));
    }

    stream.unmount().await;
}

#[tokio::test]
async fn test_remount_starts_fresh() {
    let server = MockApiServer::start(vec![(
        STREAM,
        vec![Reply::stream(&["data: {\"a\":1}\n\n"], true)],
    )])
    .await;

    let config = server.dashboard_config();
    let viewer = StreamViewer::new(&config.api, &config.stream);
    let state = viewer.state();

    let stream = viewer.mount().await.unwrap();
    wait_until(|| state.read().len() == 1).await;
    stream.unmount().await;

    let stream = viewer.mount().await.unwrap();
    wait_until(|| server.hits(STREAM) == 2).await;
    wait_until(|| state.read().len() == 1).await;
    assert_eq!(state.read().latest().map(|e| e.seq), Some(1));

    stream.unmount().await;
}

#[tokio::test]
async fn test_named_events_ignored() {
    let server = MockApiServer::start(vec![(
        STREAM,
        vec![Reply::stream(
            &[
                "event: candle\ndata: {\"named\":1}\n\n",
                "event: message\ndata: {\"explicit\":2}\n\n",
                "event: status\ndata: {broken\n\n",
                "data: {\"plain\":3}\n\n",
            ],
            true,
        )],
    )])
    .await;

    let config = server.dashboard_config();
    let viewer = StreamViewer::new(&config.api, &config.stream);
    let state = viewer.state();
    let stream = viewer.mount().await.unwrap();

    wait_until(|| state.read().latest().is_some_and(|e| e.payload == json!({"plain": 3}))).await;
    assert_eq!(stream.metrics().events_received, 4);
    {
        let state = state.read();
        let payloads: Vec<_> = state.events().map(|e| e.payload.clone()).collect();
        assert_eq!(payloads, vec![json!({"explicit": 2}), json!({"plain": 3})]);
        assert_eq!(state.rejected_count(), 0);
    }

    stream.unmount().await;
}

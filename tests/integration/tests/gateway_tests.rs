//! Gateway Integration Tests
//!
//! Each test starts its own gateway on an ephemeral port with an in-memory
//! message store, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;
use std::time::Duration;

use chat_common::AppConfig;
use chat_db::MemoryMessageStore;
use futures_util::future::join_all;
use integration_tests::{fixtures::*, TestServer, RECV_TIMEOUT};
use serde_json::{json, Value};

// ============================================================================
// Connection Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");

    server.stop().await;
}

#[tokio::test]
async fn test_hello_on_connect() {
    let server = TestServer::start().await.unwrap();
    let client = server.connect().await.unwrap();

    assert_eq!(client.hello["op"], 10);
    assert_eq!(client.hello["d"]["heartbeat_interval"], 45_000);
}

#[tokio::test]
async fn test_heartbeat_is_acked() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(1, json!(0)).await.unwrap();
    let ack = client.recv().await.unwrap();
    assert_eq!(ack, json!({"op": 11}));
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_join_publishes_online_set() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(4, join_payload("alice")).await.unwrap();
    let first = observer.recv_dispatch("online").await.unwrap();
    assert_eq!(first["d"], json!(["alice"]));
    assert_eq!(first["s"], 1);

    client.send_op(4, json!("bob")).await.unwrap();
    let second = observer.recv_dispatch("online").await.unwrap();
    assert_eq!(second["d"], json!(["alice", "bob"]));
    assert_eq!(second["s"], 2);
}

#[tokio::test]
async fn test_blank_join_is_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_subscribed(&["online"]).await.unwrap();

    client.send_op(4, join_payload("   ")).await.unwrap();
    client.send_op(4, json!({})).await.unwrap();

    // Nothing was published before the ACK
    client.sync().await.unwrap();
    assert!(server.state.service_context().registry().is_empty());
}

#[tokio::test]
async fn test_leave_publishes_even_when_absent() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_subscribed(&["online"]).await.unwrap();

    client.send_op(5, join_payload("ghost")).await.unwrap();
    let frame = client.recv_dispatch("online").await.unwrap();
    assert_eq!(frame["d"], json!([]));
}

#[tokio::test]
async fn test_disconnect_removes_user() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();

    let mut client = server.connect().await.unwrap();
    client.send_op(4, join_payload("carol")).await.unwrap();
    assert_eq!(
        observer.recv_dispatch("online").await.unwrap()["d"],
        json!(["carol"])
    );

    client.close().await.unwrap();

    let frame = observer.recv_dispatch("online").await.unwrap();
    assert_eq!(frame["d"], json!([]));
    assert!(!server.state.service_context().registry().contains("carol"));
}

#[tokio::test]
async fn test_heartbeat_timeout_closes_and_removes_user() {
    let config = AppConfig::from_lookup(|key| match key {
        "GATEWAY_HEARTBEAT_INTERVAL_MS" => Some("50".to_string()),
        "GATEWAY_HEARTBEAT_TIMEOUT_MS" => Some("300".to_string()),
        _ => None,
    })
    .unwrap();
    let server = TestServer::start_with_config(config, Arc::new(MemoryMessageStore::new()))
        .await
        .unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();

    let name = unique_username();
    let mut client = server.connect().await.unwrap();
    client.send_op(4, join_payload(&name)).await.unwrap();

    // The client goes quiet while the observer keeps its own session alive
    let emptied = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            observer.send_op(1, Value::Null).await.unwrap();
            let frame = observer.recv().await.unwrap();
            if frame["op"] == 0 && frame["t"] == "online" && frame["d"] == json!([]) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(emptied.is_ok(), "silent session was never removed");

    assert_eq!(client.recv_close().await.unwrap(), 4009);
    assert!(!server.state.service_context().registry().contains(&name));
}

#[tokio::test]
async fn test_disconnect_without_join_publishes_nothing() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();

    let client = server.connect().await.unwrap();
    client.close().await.unwrap();

    let other = unique_username();
    let mut joiner = server.connect().await.unwrap();
    joiner.send_op(4, join_payload(&other)).await.unwrap();

    // The first online frame the observer sees is the join, not a disconnect
    let frame = observer.recv_dispatch("online").await.unwrap();
    assert_eq!(frame["d"], json!([other]));
}

#[tokio::test]
async fn test_typing_is_relayed_verbatim() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["typing"]).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(6, json!("dave")).await.unwrap();
    assert_eq!(
        observer.recv_dispatch("typing").await.unwrap()["d"],
        json!("dave")
    );

    client.send_op(6, json!({"username": ""})).await.unwrap();
    assert_eq!(observer.recv_dispatch("typing").await.unwrap()["d"], json!(""));

    client.send_op(6, json!(null)).await.unwrap();
    assert_eq!(
        observer.recv_dispatch("typing").await.unwrap()["d"],
        json!(null)
    );
}

#[tokio::test]
async fn test_concurrent_joins_lose_nothing() {
    const CLIENTS: usize = 50;

    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();

    let joins = (0..CLIENTS).map(|i| {
        let server = &server;
        async move {
            let mut client = server.connect().await.unwrap();
            client
                .send_op(4, join_payload(&format!("user{i:03}")))
                .await
                .unwrap();
            client.sync().await.unwrap();
            client
        }
    });
    let _clients = join_all(joins).await;

    let mut last = json!(null);
    for _ in 0..CLIENTS {
        last = observer.recv_dispatch("online").await.unwrap()["d"].clone();
    }

    assert_eq!(last.as_array().unwrap().len(), CLIENTS);
    assert_eq!(server.state.service_context().registry().len(), CLIENTS);
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_message_is_stored_and_relayed() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["messages"]).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client
        .send_op(7, message_payload("alice", "hello"))
        .await
        .unwrap();
    let first = observer.recv_dispatch("messages").await.unwrap();
    assert_eq!(first["d"], json!({"id": 1, "sender": "alice", "content": "hello"}));

    client
        .send_op(7, json!({"sender": "bob", "content": "hi", "id": 999}))
        .await
        .unwrap();
    let second = observer.recv_dispatch("messages").await.unwrap();
    assert_eq!(second["d"]["id"], 2);
}

#[tokio::test]
async fn test_store_failure_reports_error_and_keeps_socket() {
    let server = TestServer::start_with_store(Arc::new(UnavailableStore))
        .await
        .unwrap();
    let mut client = server.connect_subscribed(&["messages"]).await.unwrap();

    client
        .send_op(7, message_payload("alice", "lost"))
        .await
        .unwrap();

    let reply = client.recv().await.unwrap();
    assert_eq!(reply["op"], 8);
    assert_eq!(reply["d"]["code"], "STORE_UNAVAILABLE");

    // Still open, and nothing was published on messages
    client.sync().await.unwrap();
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_subscribed(&["messages"]).await.unwrap();

    client.send_op(3, json!({"topic": "messages"})).await.unwrap();
    client
        .send_op(7, message_payload("alice", "quiet"))
        .await
        .unwrap();

    client.sync().await.unwrap();
}

// ============================================================================
// Protocol Error Tests
// ============================================================================

#[tokio::test]
async fn test_invalid_json_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_text("not json").await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_unknown_op_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(42, json!(null)).await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_server_op_closes_with_unknown_opcode() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(10, json!(null)).await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), 4001);
}

#[tokio::test]
async fn test_unknown_topic_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.subscribe("users").await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_protocol_error_still_runs_disconnect() {
    let server = TestServer::start().await.unwrap();
    let mut observer = server.connect_subscribed(&["online"]).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(4, join_payload("erin")).await.unwrap();
    observer.recv_dispatch("online").await.unwrap();

    client.send_text("{").await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), 4002);

    let frame = observer.recv_dispatch("online").await.unwrap();
    assert_eq!(frame["d"], json!([]));
}

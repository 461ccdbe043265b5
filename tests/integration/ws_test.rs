//! Integration tests for WebSocket joining, relaying, and teardown.

use std::time::Duration;

use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::helpers::TestServer;

#[tokio::test]
async fn test_join_greets_and_announces() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;

    let (frames, error) = alice.join("Alice", "Lobby").await;
    assert_eq!(error, None);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["event"], "message");
    assert_eq!(frames[0]["data"]["sender"], "Admin");
    assert_eq!(frames[0]["data"]["body"], "Welcome to room, Lobby");
    assert!(frames[0]["data"]["createdAt"].is_i64());
    assert_eq!(frames[1]["event"], "roomData");
    assert_eq!(frames[1]["data"]["room"], "Lobby");
    assert_eq!(frames[1]["data"]["users"][0]["username"], "Alice");

    let mut bob = server.connect().await;
    let (frames, error) = bob.join("Bob", "  lobby ").await;
    assert_eq!(error, None);
    assert_eq!(frames.len(), 2);

    let notice = alice.recv_event("message").await;
    assert_eq!(notice["sender"], "Admin");
    assert_eq!(notice["body"], "Bob has joined!");

    let room = alice.recv_event("roomData").await;
    let users: Vec<&str> = room["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(users, ["Alice", "Bob"]);
}

#[tokio::test]
async fn test_rejected_joins_leave_connection_usable() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("Alice", "r1").await;

    let (frames, error) = bob.join("ALICE", "R1").await;
    assert!(frames.is_empty());
    assert_eq!(error.as_deref(), Some("Username is in use!"));

    let (_, error) = bob.join("   ", "r1").await;
    assert_eq!(error.as_deref(), Some("Username and room are required!"));

    let (_, error) = bob.join("Bob", "r1").await;
    assert_eq!(error, None);
    assert_eq!(alice.recv_event("message").await["body"], "Bob has joined!");

    let (_, error) = bob.join("Bobby", "r2").await;
    assert_eq!(error.as_deref(), Some("You have already joined a room!"));

    // The same name in another room is fine.
    let mut carol = server.connect().await;
    let (_, error) = carol.join("alice", "r2").await;
    assert_eq!(error, None);
}

#[tokio::test]
async fn test_messages_relay_to_room_only() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    let mut outsider = server.connect().await;

    alice.join("Alice", "r1").await;
    bob.join("Bob", "r1").await;
    outsider.join("Eve", "r2").await;
    alice.recv_event("message").await;
    alice.recv_event("roomData").await;

    let (frames, error) = bob.say("hello").await;
    assert_eq!(error, None);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["data"]["sender"], "Bob");
    assert_eq!(frames[0]["data"]["body"], "hello");

    let relayed = alice.recv_event("message").await;
    assert_eq!(relayed["sender"], "Bob");
    assert_eq!(relayed["body"], "hello");

    outsider.assert_silent(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_profanity_is_rejected_without_broadcast() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("Alice", "r1").await;
    bob.join("Bob", "r1").await;
    alice.recv_event("message").await;
    alice.recv_event("roomData").await;

    let (frames, error) = bob.say("what the fuck").await;
    assert!(frames.is_empty());
    assert_eq!(error.as_deref(), Some("Profanity is not allowed!"));

    let (frames, error) = bob.say("what.the.fuck").await;
    assert!(frames.is_empty());
    assert_eq!(error.as_deref(), Some("Profanity is not allowed!"));

    alice.assert_silent(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_location_is_shared_as_map_link() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    alice.join("Alice", "r1").await;

    let id = alice
        .emit("sendLocation", json!({"latitude": 10.5, "longitude": -20.25}))
        .await;
    let (frames, error) = alice.until_ack(id).await;

    assert_eq!(error, None);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["event"], "locationMessage");
    assert_eq!(frames[0]["data"]["sender"], "Alice");
    assert_eq!(
        frames[0]["data"]["url"],
        "https://google.com/maps?q=10.5,-20.25"
    );
}

#[tokio::test]
async fn test_send_before_join_is_acknowledged_silently() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;

    let (frames, error) = alice.say("anyone?").await;
    assert!(frames.is_empty());
    assert_eq!(error, None);
}

#[tokio::test]
async fn test_bad_frames_are_reported() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;

    alice.send_raw("not json").await;
    let error = alice.recv_event("error").await;
    assert!(error["message"].as_str().unwrap().starts_with("Malformed frame"));

    let id = alice.emit("shout", json!("hi")).await;
    let (_, error) = alice.until_ack(id).await;
    assert_eq!(error.as_deref(), Some("Unknown event: shout"));

    let (_, error) = alice.join("Alice", "r1").await;
    assert_eq!(error, None);
}

#[tokio::test]
async fn test_closing_socket_announces_departure() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("Alice", "r1").await;
    bob.join("Bob", "r1").await;
    alice.recv_event("message").await;
    alice.recv_event("roomData").await;

    bob.close().await;

    assert_eq!(alice.recv_event("message").await["body"], "Bob has left!");
    let room = alice.recv_event("roomData").await;
    assert_eq!(room["users"].as_array().unwrap().len(), 1);
    assert_eq!(server.state.realtime.registry.session_count(), 1);

    // The name is free again.
    let mut bob_again = server.connect().await;
    let (_, error) = bob_again.join("Bob", "r1").await;
    assert_eq!(error, None);
}

#[tokio::test]
async fn test_disconnect_event_closes_socket() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("Alice", "r1").await;
    bob.join("Bob", "r1").await;
    alice.recv_event("message").await;
    alice.recv_event("roomData").await;

    bob.emit("disconnect", json!(null)).await;
    bob.expect_closed().await;

    assert_eq!(alice.recv_event("message").await["body"], "Bob has left!");
    alice.recv_event("roomData").await;
    alice.assert_silent(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_shutdown_closes_sockets_and_refuses_upgrades() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect().await;
    alice.join("Alice", "r1").await;

    server.state.realtime.shutdown();
    alice.expect_closed().await;

    match connect_async(server.ws_url()).await {
        Err(WsError::Http(resp)) => assert_eq!(resp.status(), 503),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("upgrade accepted after shutdown"),
    }

    server.stop().await;
}

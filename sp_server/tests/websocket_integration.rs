//! End-to-end WebSocket round trips against a real listener.

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use sixmax_poker::TableActor;
use sp_server::ws::{self, AppState};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn spawn_server() -> String {
    let (actor, handle) = TableActor::new(1_000, 10, 20);
    tokio::spawn(actor.run());

    let app = axum::Router::new()
        .route("/ws", axum::routing::get(ws::websocket_handler))
        .with_state(AppState { table: handle });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("ws://{addr}/ws")
}

async fn connect(url: &str) -> Socket {
    let (socket, _) = connect_async(url).await.unwrap();
    socket
}

async fn recv_json(socket: &mut Socket) -> Value {
    loop {
        let message = socket.next().await.unwrap().unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send_json(socket: &mut Socket, json: &str) {
    socket.send(Message::text(json)).await.unwrap();
}

#[tokio::test]
async fn test_connect_receives_lobby_state() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;

    let state = recv_json(&mut socket).await;
    assert_eq!(state["event"], "state");
    assert_eq!(state["joined"], false);
    assert_eq!(state["gameStarted"], false);
    assert_eq!(state["phase"], "lobby");
    assert_eq!(state["players"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_join_start_and_private_cards() {
    let url = spawn_server().await;
    let mut alice = connect(&url).await;
    recv_json(&mut alice).await;
    let mut bob = connect(&url).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, r#"{"event":"join","name":"alice"}"#).await;
    let state = recv_json(&mut alice).await;
    assert_eq!(state["joined"], true);
    // Bob sees the join as an unseated viewer.
    let state = recv_json(&mut bob).await;
    assert_eq!(state["joined"], false);
    assert_eq!(state["players"][0]["name"], "alice");

    send_json(&mut bob, r#"{"event":"join","name":"bob"}"#).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, r#"{"event":"startGame"}"#).await;
    let alice_state = recv_json(&mut alice).await;
    let bob_state = recv_json(&mut bob).await;
    assert_eq!(alice_state["gameStarted"], true);
    assert_eq!(alice_state["handInProgress"], true);
    assert_eq!(alice_state["yourCards"].as_array().unwrap().len(), 2);
    assert_eq!(bob_state["yourCards"].as_array().unwrap().len(), 2);
    // Hole cards are private: seat entries only say whether cards exist.
    assert_eq!(alice_state["players"][1]["hasCards"], true);
    assert!(alice_state["players"][1].get("holeCards").is_none());
    // Card codes are two ASCII characters.
    let code = alice_state["yourCards"][0].as_str().unwrap();
    assert_eq!(code.len(), 2);
}

#[tokio::test]
async fn test_error_message_goes_to_offender_only() {
    let url = spawn_server().await;
    let mut alice = connect(&url).await;
    recv_json(&mut alice).await;

    // Starting without being seated is a protocol error.
    send_json(&mut alice, r#"{"event":"startGame"}"#).await;
    let reply = recv_json(&mut alice).await;
    assert_eq!(reply["event"], "errorMessage");
    assert!(reply["message"].as_str().unwrap().contains("not seated"));
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;
    recv_json(&mut socket).await;

    send_json(&mut socket, "{not json").await;
    let reply = recv_json(&mut socket).await;
    assert_eq!(reply["event"], "errorMessage");
    assert_eq!(reply["message"], "Invalid message format");
}

#[tokio::test]
async fn test_disconnect_is_broadcast() {
    let url = spawn_server().await;
    let mut alice = connect(&url).await;
    recv_json(&mut alice).await;
    let mut bob = connect(&url).await;
    recv_json(&mut bob).await;

    send_json(&mut alice, r#"{"event":"join","name":"alice"}"#).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;
    send_json(&mut bob, r#"{"event":"join","name":"bob"}"#).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    drop(bob);
    // Alice sees bob leave the seat list.
    let state = recv_json(&mut alice).await;
    assert_eq!(state["players"].as_array().unwrap().len(), 1);
    assert_eq!(state["players"][0]["name"], "alice");
}

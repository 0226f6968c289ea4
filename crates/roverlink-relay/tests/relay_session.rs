//! End-to-end session tests driving the relay over real WebSockets.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use roverlink_hal::ServoBank;
use roverlink_relay::{AppContext, RelayServer};
use roverlink_types::{AiCommand, HARDWARE_ATTACHED_KEY, ServerEvent};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> (Arc<AppContext>, SocketAddr) {
    let ctx = AppContext::new(ServoBank::simulated());
    ctx.status.mark_hardware_attached();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(RelayServer::new(Arc::clone(&ctx)).run_on(listener));
    (ctx, addr)
}

async fn connect(addr: &SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}")).await.expect("connect");
    ws
}

async fn next_event(client: &mut Client) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(2), client.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .expect("socket error");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("valid server event"),
        other => panic!("unexpected frame: {other:?}"),
    }
}

async fn send_command(client: &mut Client, data: &str) {
    let frame = serde_json::to_string(&json!({"event": "robot command", "data": data})).unwrap();
    client.send(Message::Text(frame.into())).await.unwrap();
}

async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "expected no frame, got {result:?}");
}

async fn wait_for_throttle(ctx: &Arc<AppContext>, expect: u8) {
    for _ in 0..50 {
        if ctx.bank.lock().await.throttle_position() == expect {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("throttle never reached {expect}");
}

#[tokio::test]
async fn greeting_goes_to_the_new_client_only() {
    let (_ctx, addr) = start_relay().await;

    let mut first = connect(&addr).await;
    assert_eq!(next_event(&mut first).await, ServerEvent::greeting());

    // A second connection gets its own greeting; the first hears nothing.
    let mut second = connect(&addr).await;
    assert_eq!(next_event(&mut second).await, ServerEvent::greeting());
    assert_silent(&mut first).await;
}

#[tokio::test]
async fn ai_trigger_reaches_peers_but_not_the_sender() {
    let (_ctx, addr) = start_relay().await;

    let mut sender = connect(&addr).await;
    let mut peer = connect(&addr).await;
    next_event(&mut sender).await;
    next_event(&mut peer).await;

    send_command(&mut sender, "face-begin").await;
    assert_eq!(
        next_event(&mut peer).await,
        ServerEvent::Ai {
            command: AiCommand::FaceStart,
        }
    );
    assert_silent(&mut sender).await;

    send_command(&mut sender, "face-end").await;
    assert_eq!(
        next_event(&mut peer).await,
        ServerEvent::Ai {
            command: AiCommand::AiStop,
        }
    );
}

#[tokio::test]
async fn commands_move_the_simulated_servos() {
    let (ctx, addr) = start_relay().await;

    let mut client = connect(&addr).await;
    next_event(&mut client).await;

    send_command(&mut client, "manual-throttle-forward-0").await;
    wait_for_throttle(&ctx, 65).await;

    send_command(&mut client, "manual-turn-left").await;
    for _ in 0..50 {
        if ctx.bank.lock().await.steering_position() == 40 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("steering never reached 40");
}

#[tokio::test]
async fn rejected_command_is_echoed_to_the_sender_only() {
    let (ctx, addr) = start_relay().await;

    let mut sender = connect(&addr).await;
    let mut peer = connect(&addr).await;
    next_event(&mut sender).await;
    next_event(&mut peer).await;

    send_command(&mut sender, "manual-throttle-warp9").await;
    match next_event(&mut sender).await {
        ServerEvent::Error { data } => assert!(data.contains("warp9")),
        other => panic!("expected an error echo, got {other:?}"),
    }
    assert_silent(&mut peer).await;

    // Nothing reached the actuators.
    assert_eq!(ctx.bank.lock().await.throttle_position(), 90);
}

#[tokio::test]
async fn status_update_relays_with_the_hardware_flag_injected() {
    let (_ctx, addr) = start_relay().await;

    let mut sender = connect(&addr).await;
    let mut peer = connect(&addr).await;
    next_event(&mut sender).await;
    next_event(&mut peer).await;

    let frame = serde_json::to_string(&json!({
        "event": "robot update",
        "data": {"battery": 71, "hardwareAttached": false},
    }))
    .unwrap();
    sender.send(Message::Text(frame.into())).await.unwrap();

    match next_event(&mut peer).await {
        ServerEvent::Status { data } => {
            assert_eq!(data["battery"], json!(71));
            assert_eq!(data[HARDWARE_ATTACHED_KEY], json!(true));
        }
        other => panic!("expected a status relay, got {other:?}"),
    }
    assert_silent(&mut sender).await;
}

#[tokio::test]
async fn unknown_event_name_is_echoed_as_an_error() {
    let (_ctx, addr) = start_relay().await;

    let mut client = connect(&addr).await;
    next_event(&mut client).await;

    let frame = serde_json::to_string(&json!({"event": "robot teleport", "data": "up"})).unwrap();
    client.send(Message::Text(frame.into())).await.unwrap();

    assert!(matches!(
        next_event(&mut client).await,
        ServerEvent::Error { .. }
    ));
}

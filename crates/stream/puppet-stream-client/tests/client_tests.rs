use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use puppet_retarget_core::{JointKey, PoseFrame};
use puppet_stream_client::{spawn_client_thread, ConnectionState, StreamClient};
use puppet_stream_core::{encode_pose, BackoffConfig, PageLocation, StreamConfig};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::protocol::Message};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn listener() -> (TcpListener, StreamConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = StreamConfig {
        location: PageLocation::new("http:", "127.0.0.1"),
        port,
        backoff: BackoffConfig {
            base: Duration::from_millis(20),
            max: Duration::from_millis(100),
            max_attempts: 10,
        },
    };
    (listener, config)
}

/// Accept one client, send `messages`, then close.
async fn serve_once(listener: &TcpListener, messages: Vec<String>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(stream).await.unwrap();
    for m in messages {
        ws.send(Message::Text(m.into())).await.unwrap();
    }
    let _ = ws.close(None).await;
}

#[tokio::test]
async fn forwards_pose_frames_in_order() {
    init_tracing();
    let (listener, config) = listener().await;
    let messages = puppet_test_fixtures::streams::messages("webcam-session").unwrap();
    let server = tokio::spawn(async move {
        serve_once(&listener, messages).await;
        listener
    });

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let client = tokio::spawn(StreamClient::new(&config).run(tx));

    let mut stamps = Vec::new();
    for _ in 0..3 {
        let frame = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        stamps.push(frame.timestamp.unwrap());
    }
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));

    client.abort();
    let _ = server.await;
}

#[tokio::test]
async fn reconnects_after_server_drops() {
    init_tracing();
    let (listener, config) = listener().await;
    let first = encode_pose(&PoseFrame::new().with_angle(JointKey::Head, 1.0));
    let second = encode_pose(&PoseFrame::new().with_angle(JointKey::Head, 2.0));
    let server = tokio::spawn(async move {
        serve_once(&listener, vec![first]).await;
        serve_once(&listener, vec![second]).await;
    });

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let client = StreamClient::new(&config);
    let mut status = client.subscribe_status();
    let client = tokio::spawn(client.run(tx));

    let mut angles = Vec::new();
    for _ in 0..2 {
        let frame = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
        angles.push(frame.sample(JointKey::Head).unwrap().angle.unwrap());
    }
    assert_eq!(angles, vec![1.0, 2.0]);

    // the second server hangs up too; the client goes back to retrying
    timeout(
        Duration::from_secs(5),
        status.wait_for(|s| *s != ConnectionState::Open),
    )
    .await
    .unwrap()
    .unwrap();

    client.abort();
    server.await.unwrap();
}

#[tokio::test]
async fn stops_when_the_sink_is_dropped() {
    init_tracing();
    let (listener, config) = listener().await;
    let pose = encode_pose(&PoseFrame::new().with_angle(JointKey::Hip, 5.0));
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let _ = ws.send(Message::Text(pose.into())).await;
        // keep the connection open; the client must leave on its own
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    drop(rx);
    timeout(Duration::from_secs(5), StreamClient::new(&config).run(tx))
        .await
        .expect("client should stop once its sink is gone");
    server.abort();
}

#[tokio::test]
async fn keeps_retrying_while_nothing_listens() {
    init_tracing();
    let (listener, config) = listener().await;
    drop(listener);

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let client = StreamClient::new(&config);
    let mut status = client.subscribe_status();
    let handle = tokio::spawn(client.run(tx));

    timeout(
        Duration::from_secs(5),
        status.wait_for(|s| *s == ConnectionState::Closed),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn client_thread_feeds_a_std_receiver_and_shuts_down() {
    init_tracing();
    let (listener, config) = listener().await;
    let pose = encode_pose(&PoseFrame::new().with_angle(JointKey::RightUpperArm, 12.0));
    let server = tokio::spawn(async move {
        serve_once(&listener, vec![pose]).await;
    });

    let (rx, handle) = spawn_client_thread(config).unwrap();
    let frame = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        frame.sample(JointKey::RightUpperArm).unwrap().angle,
        Some(12.0)
    );
    server.await.unwrap();

    // nothing is listening any more and no frames will come; the thread must
    // still stop when asked
    timeout(
        Duration::from_secs(5),
        tokio::task::spawn_blocking(move || handle.shutdown()),
    )
    .await
    .expect("client thread should exit on shutdown")
    .unwrap();
}

#[tokio::test]
async fn dropping_the_thread_handle_disconnects() {
    init_tracing();
    let (listener, config) = listener().await;
    let (rx, handle) = spawn_client_thread(config).unwrap();

    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(stream).await.unwrap();
    drop(handle);

    // the client side goes away without sending anything
    let next = timeout(Duration::from_secs(5), ws.next()).await.unwrap();
    assert!(matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
    drop(rx);
}

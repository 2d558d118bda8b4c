//! Connect to a local pose producer and log each frame.
//!
//! `RUST_LOG=info cargo run -p puppet-stream-client --example print_frames [host]`

use puppet_retarget_core::JointKey;
use puppet_stream_client::{StreamClient, StreamConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(host) => StreamConfig::for_host(host),
        None => StreamConfig::default(),
    };
    tracing::info!("listening for poses on {}", config.endpoint());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let client = tokio::spawn(StreamClient::new(&config).run(tx));

    while let Some(frame) = rx.recv().await {
        let head = frame.sample(JointKey::Head).and_then(|s| s.angle);
        tracing::info!(
            joints = frame.joints.len(),
            ?head,
            root = ?frame.root_position,
            "pose"
        );
    }
    client.await?;
    Ok(())
}

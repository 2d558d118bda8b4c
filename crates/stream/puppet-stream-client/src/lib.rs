//! Tokio + tungstenite driver for [`puppet_stream_core::StreamMachine`].

mod client;
mod sink;

pub use client::{spawn_client_thread, ClientThread, StreamClient};
pub use sink::{FrameSink, SinkClosed};

pub use puppet_stream_core::{ConnectionState, StreamConfig};

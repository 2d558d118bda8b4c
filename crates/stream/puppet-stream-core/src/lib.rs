//! Pose stream client, transport-agnostic half.
//!
//! [`StreamMachine`] tracks the connection lifecycle and decodes wire messages
//! into [`PoseFrame`]s; drivers (see `puppet-stream-client`) own the socket and
//! the timers.

pub mod backoff;
pub mod config;
pub mod endpoint;
pub mod machine;
pub mod message;

pub use backoff::{Backoff, BackoffConfig};
pub use config::StreamConfig;
pub use endpoint::{Endpoint, PageLocation, DEFAULT_PORT};
pub use machine::{ConnectionId, ConnectionState, StreamMachine};
pub use message::{decode_message, encode_pose, Inbound, MessageError};

pub use puppet_retarget_core::PoseFrame;

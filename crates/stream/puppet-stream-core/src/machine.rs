//! Connection lifecycle as an explicit state machine.
//!
//! The machine never touches a socket. A driver calls [`StreamMachine::connect`]
//! to start an attempt, reports transport events tagged with the attempt's
//! [`ConnectionId`], and sleeps for whatever delay a failure returns before
//! calling [`StreamMachine::on_reconnect_timer`]. Events from superseded
//! attempts are ignored, so a late close from an old socket cannot schedule a
//! second reconnect.

use std::time::Duration;

use puppet_retarget_core::PoseFrame;

use crate::backoff::Backoff;
use crate::config::StreamConfig;
use crate::endpoint::Endpoint;
use crate::message::{decode_message, Inbound};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ConnectionState {
    /// No attempt started yet.
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    /// Status line for a UI.
    pub fn status_text(self) -> &'static str {
        match self {
            ConnectionState::Idle | ConnectionState::Connecting => "Connecting…",
            ConnectionState::Open => "Connected to WebSocket. Receiving pose...",
            ConnectionState::Closed => "WebSocket disconnected.",
        }
    }
}

#[derive(Debug)]
pub struct StreamMachine {
    endpoint: Endpoint,
    backoff: Backoff,
    state: ConnectionState,
    current: Option<ConnectionId>,
    next_id: u64,
    reconnect_scheduled: bool,
    frames_received: u64,
    messages_dropped: u64,
}

impl StreamMachine {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            endpoint: config.endpoint(),
            backoff: Backoff::new(config.backoff),
            state: ConnectionState::Idle,
            current: None,
            next_id: 0,
            reconnect_scheduled: false,
            frames_received: 0,
            messages_dropped: 0,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn current(&self) -> Option<ConnectionId> {
        self.current
    }

    pub fn retries(&self) -> u32 {
        self.backoff.attempts()
    }

    pub fn reconnect_scheduled(&self) -> bool {
        self.reconnect_scheduled
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped
    }

    fn is_current(&self, id: ConnectionId) -> bool {
        if self.current == Some(id) {
            return true;
        }
        log::debug!("ignoring event from stale connection {}", id.0);
        false
    }

    /// Start a new attempt. Any previous attempt becomes stale.
    pub fn connect(&mut self) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.current = Some(id);
        self.state = ConnectionState::Connecting;
        self.reconnect_scheduled = false;
        log::info!("connecting to {} (attempt {})", self.endpoint, id.0);
        id
    }

    pub fn on_open(&mut self, id: ConnectionId) {
        if !self.is_current(id) || self.state != ConnectionState::Connecting {
            return;
        }
        self.state = ConnectionState::Open;
        self.backoff.reset();
        log::info!("connected to {}", self.endpoint);
    }

    /// Decode one text message. Only `pose` messages produce a frame.
    pub fn on_message(&mut self, id: ConnectionId, text: &str) -> Option<PoseFrame> {
        if !self.is_current(id) || self.state != ConnectionState::Open {
            return None;
        }
        match decode_message(text) {
            Ok(Inbound::Pose(frame)) => {
                self.frames_received += 1;
                Some(frame)
            }
            Ok(Inbound::Ignored(kind)) => {
                log::debug!("ignoring '{kind}' message");
                None
            }
            Err(err) => {
                self.messages_dropped += 1;
                log::warn!("dropping malformed message: {err}");
                None
            }
        }
    }

    pub fn on_error(&mut self, id: ConnectionId) -> Option<Duration> {
        if self.is_current(id) {
            log::warn!("connection error on {}", self.endpoint);
        }
        self.close(id)
    }

    pub fn on_close(&mut self, id: ConnectionId) -> Option<Duration> {
        self.close(id)
    }

    /// Enter `Closed` and schedule one reconnect per attempt.
    fn close(&mut self, id: ConnectionId) -> Option<Duration> {
        if !self.is_current(id) {
            return None;
        }
        self.state = ConnectionState::Closed;
        if self.reconnect_scheduled {
            return None;
        }
        self.reconnect_scheduled = true;
        let delay = self.backoff.next_delay();
        log::info!(
            "disconnected from {}; reconnecting in {} ms (retry {})",
            self.endpoint,
            delay.as_millis(),
            self.backoff.attempts()
        );
        Some(delay)
    }

    /// The scheduled delay elapsed. Returns the new attempt's id, or `None`
    /// when nothing was scheduled.
    pub fn on_reconnect_timer(&mut self) -> Option<ConnectionId> {
        if self.state != ConnectionState::Closed || !self.reconnect_scheduled {
            return None;
        }
        Some(self.connect())
    }
}

use std::io;
use std::thread;

use futures_util::StreamExt;
use puppet_retarget_core::PoseFrame;
use puppet_stream_core::{ConnectionId, ConnectionState, StreamConfig, StreamMachine};
use tokio::sync::{oneshot, watch};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::sink::FrameSink;

/// How one connection attempt ended.
enum Attempt {
    Dropped,
    SinkClosed,
}

/// Keeps a WebSocket connection to the pose producer alive and forwards every
/// decoded frame to a sink.
pub struct StreamClient {
    machine: StreamMachine,
    status: watch::Sender<ConnectionState>,
}

impl StreamClient {
    pub fn new(config: &StreamConfig) -> Self {
        let (status, _) = watch::channel(ConnectionState::Idle);
        Self {
            machine: StreamMachine::new(config),
            status,
        }
    }

    /// Follow connection state changes, e.g. to show a status line.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionState> {
        self.status.subscribe()
    }

    pub fn machine(&self) -> &StreamMachine {
        &self.machine
    }

    fn publish(&self) {
        self.status.send_replace(self.machine.state());
    }

    /// Run until the sink closes. Connection failures only delay the next attempt.
    pub async fn run<S: FrameSink>(mut self, mut sink: S) {
        let mut id = self.machine.connect();
        loop {
            self.publish();
            let mut delay = None;
            match self.attempt(id, &mut sink, &mut delay).await {
                Attempt::SinkClosed => {
                    tracing::info!("frame sink closed; stopping pose stream");
                    return;
                }
                Attempt::Dropped => {}
            }
            if let Some(d) = self.machine.on_close(id) {
                delay = Some(d);
            }
            self.publish();
            if sink.is_closed() {
                tracing::info!("frame sink closed; stopping pose stream");
                return;
            }
            if let Some(d) = delay {
                tracing::debug!("next connection attempt in {d:?}");
                sleep(d).await;
            }
            id = match self.machine.on_reconnect_timer() {
                Some(next) => next,
                None => self.machine.connect(),
            };
        }
    }

    async fn attempt<S: FrameSink>(
        &mut self,
        id: ConnectionId,
        sink: &mut S,
        delay: &mut Option<std::time::Duration>,
    ) -> Attempt {
        let url = self.machine.endpoint().url();
        let mut ws = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                tracing::warn!("pose stream connect to {url} failed: {e}");
                *delay = self.machine.on_error(id);
                return Attempt::Dropped;
            }
        };
        self.machine.on_open(id);
        self.publish();

        while let Some(msg) = ws.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let Some(frame) = self.machine.on_message(id, text.as_str()) else {
                        continue;
                    };
                    if sink.send_frame(frame).is_err() {
                        return Attempt::SinkClosed;
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("pose stream closed by server");
                    break;
                }
                Ok(Message::Binary(bin)) => {
                    tracing::debug!("ignoring binary message: len={}", bin.len());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("pose stream error: {e}");
                    *delay = self.machine.on_error(id);
                    break;
                }
            }
        }
        Attempt::Dropped
    }
}

/// Handle to a client running on its own thread.
///
/// Dropping the handle stops the client at its next await point; the frame
/// receiver can outlive it. [`ClientThread::shutdown`] also waits for the
/// thread to finish.
pub struct ClientThread {
    stop: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ClientThread {
    pub fn shutdown(mut self) {
        self.signal();
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::warn!("pose stream thread panicked");
            }
        }
    }

    fn signal(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl Drop for ClientThread {
    fn drop(&mut self) {
        self.signal();
    }
}

/// Run a client on its own thread with a single-threaded runtime.
///
/// For hosts without an async runtime (a Bevy app); frames arrive on the
/// returned receiver in order. The client stops when the [`ClientThread`]
/// handle is shut down or dropped, or when a frame finds the receiver gone.
pub fn spawn_client_thread(
    config: StreamConfig,
) -> io::Result<(std::sync::mpsc::Receiver<PoseFrame>, ClientThread)> {
    let (tx, rx) = std::sync::mpsc::channel();
    let (stop, stopped) = oneshot::channel::<()>();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let thread = thread::Builder::new()
        .name("pose-stream".into())
        .spawn(move || {
            runtime.block_on(async move {
                tokio::select! {
                    _ = StreamClient::new(&config).run(tx) => {}
                    _ = stopped => tracing::info!("pose stream thread shut down"),
                }
            })
        })?;
    Ok((
        rx,
        ClientThread {
            stop: Some(stop),
            thread: Some(thread),
        },
    ))
}

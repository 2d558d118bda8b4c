use puppet_retarget_core::PoseFrame;

/// The receiving side has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Where decoded frames go. Frames must be delivered in the order given.
pub trait FrameSink: Send {
    fn send_frame(&mut self, frame: PoseFrame) -> Result<(), SinkClosed>;

    /// Early shutdown check between connection attempts.
    fn is_closed(&self) -> bool {
        false
    }
}

impl FrameSink for std::sync::mpsc::Sender<PoseFrame> {
    fn send_frame(&mut self, frame: PoseFrame) -> Result<(), SinkClosed> {
        self.send(frame).map_err(|_| SinkClosed)
    }
}

impl FrameSink for tokio::sync::mpsc::UnboundedSender<PoseFrame> {
    fn send_frame(&mut self, frame: PoseFrame) -> Result<(), SinkClosed> {
        self.send(frame).map_err(|_| SinkClosed)
    }

    fn is_closed(&self) -> bool {
        tokio::sync::mpsc::UnboundedSender::is_closed(self)
    }
}

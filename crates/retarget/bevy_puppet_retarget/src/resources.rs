use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;

use bevy::prelude::*;
use puppet_retarget_core::{FrameReport, PoseFrame, RetargetConfig, Retargeter};

/// Retargeting context for the avatar under [`crate::PuppetRigRoot`].
#[derive(Resource, Debug)]
pub struct PoseRetargeter(pub Retargeter<Entity>);

impl PoseRetargeter {
    pub fn new(config: RetargetConfig) -> Self {
        Self(Retargeter::new(config))
    }
}

/// Frames produced off the main thread (e.g. by the stream client thread).
/// Drained every update in arrival order.
#[derive(Resource)]
pub struct PoseInbox(Mutex<Receiver<PoseFrame>>);

impl PoseInbox {
    pub fn new(rx: Receiver<PoseFrame>) -> Self {
        Self(Mutex::new(rx))
    }

    /// A connected inbox and the sender feeding it.
    pub fn channel() -> (Sender<PoseFrame>, Self) {
        let (tx, rx) = std::sync::mpsc::channel();
        (tx, Self::new(rx))
    }

    pub(crate) fn drain(&self) -> Vec<PoseFrame> {
        match self.0.lock() {
            Ok(rx) => rx.try_iter().collect(),
            Err(_) => {
                log::warn!("pose inbox lock poisoned; dropping pending frames");
                Vec::new()
            }
        }
    }
}

/// Report from the most recently applied frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct LastFrameReport(pub FrameReport);

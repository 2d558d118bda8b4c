use bevy::prelude::*;
use puppet_retarget_core::PoseFrame;

/// One pose frame to apply this update.
#[derive(Event, Debug, Clone)]
pub struct PoseFrameReceived(pub PoseFrame);

/// The avatar under `root` was (re)loaded and its bone registry rebuilt.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigChanged {
    pub root: Entity,
}

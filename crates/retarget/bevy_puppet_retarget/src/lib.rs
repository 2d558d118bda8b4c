//! Bevy adapter for `puppet-retarget-core`.
//!
//! Tag the avatar's root entity with [`PuppetRigRoot`], then feed frames either
//! as [`PoseFrameReceived`] events or through a [`PoseInbox`] channel. The
//! plugin rebuilds the bone registry when the rig changes and writes joint
//! rotations and root translation once per update.

use bevy::prelude::*;
use puppet_retarget_core::RetargetConfig;

mod components;
mod events;
mod resources;
mod rig;
mod systems;

pub use components::PuppetRigRoot;
pub use events::{PoseFrameReceived, RigChanged};
pub use resources::{LastFrameReport, PoseInbox, PoseRetargeter};
pub use rig::{build_scene, EcsRig, RigQueries};
pub use systems::{apply_pose_frames_system, detect_rig_changes_system, drain_pose_inbox_system};

#[derive(Default)]
pub struct PuppetRetargetPlugin {
    pub config: RetargetConfig,
}

impl Plugin for PuppetRetargetPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PoseRetargeter::new(self.config.clone()))
            .init_resource::<LastFrameReport>()
            .add_event::<PoseFrameReceived>()
            .add_event::<RigChanged>()
            .add_systems(
                Update,
                (
                    drain_pose_inbox_system,
                    detect_rig_changes_system,
                    apply_pose_frames_system,
                )
                    .chain(),
            );
    }
}

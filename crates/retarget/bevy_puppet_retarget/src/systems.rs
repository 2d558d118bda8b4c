use bevy::prelude::*;
use bevy::render::mesh::skinning::SkinnedMesh;

use crate::components::PuppetRigRoot;
use crate::events::{PoseFrameReceived, RigChanged};
use crate::resources::{LastFrameReport, PoseInbox, PoseRetargeter};
use crate::rig::{build_scene, EcsRig, RigQueries};

fn current_root(roots: &Query<Entity, With<PuppetRigRoot>>) -> Option<Entity> {
    let mut iter = roots.iter();
    let first = iter.next();
    if first.is_some() && iter.next().is_some() {
        log::warn!("more than one PuppetRigRoot; driving the first");
    }
    first
}

/// Move frames queued by other threads into the event stream.
pub fn drain_pose_inbox_system(
    inbox: Option<Res<PoseInbox>>,
    mut frames: EventWriter<PoseFrameReceived>,
) {
    let Some(inbox) = inbox else { return };
    for frame in inbox.drain() {
        frames.send(PoseFrameReceived(frame));
    }
}

fn is_under(mut e: Entity, root: Entity, parents: &Query<&Parent>) -> bool {
    loop {
        if e == root {
            return true;
        }
        match parents.get(e) {
            Ok(parent) => e = parent.get(),
            Err(_) => return false,
        }
    }
}

/// Rebuild the bone registry when a root is tagged or untagged, a skinned mesh
/// appears, or the hierarchy under the root changes (scenes spawn their nodes
/// after the root is tagged).
#[allow(clippy::too_many_arguments)]
pub fn detect_rig_changes_system(
    added_roots: Query<(), Added<PuppetRigRoot>>,
    mut removed_roots: RemovedComponents<PuppetRigRoot>,
    added_skins: Query<(), Added<SkinnedMesh>>,
    reshaped_nodes: Query<Entity, Or<(Changed<Children>, Added<Name>)>>,
    parents: Query<&Parent>,
    roots: Query<Entity, With<PuppetRigRoot>>,
    queries: RigQueries,
    mut retargeter: ResMut<PoseRetargeter>,
    mut changed: EventWriter<RigChanged>,
) {
    let removed = removed_roots.read().count() > 0;
    let root = current_root(&roots);
    let reshaped =
        root.is_some_and(|root| reshaped_nodes.iter().any(|e| is_under(e, root, &parents)));
    if added_roots.is_empty() && added_skins.is_empty() && !removed && !reshaped {
        return;
    }

    retargeter.0.invalidate();
    let Some(root) = root else {
        log::info!("avatar root removed; retargeting paused");
        return;
    };

    let scene = build_scene(&queries, root);
    log::debug!("rig inventory: {:?}", scene.inventory());
    let registry = retargeter.0.resolve(&scene);
    log::info!(
        "rig '{}' bound: {} joints via {:?}",
        scene.name,
        registry.resolved_count(),
        registry.strategy()
    );
    changed.send(RigChanged { root });
}

/// Apply this update's frames, oldest first. Sole writer of joint rotations
/// and root translation.
pub fn apply_pose_frames_system(
    mut frames: EventReader<PoseFrameReceived>,
    roots: Query<Entity, With<PuppetRigRoot>>,
    mut queries: RigQueries,
    mut retargeter: ResMut<PoseRetargeter>,
    mut last: ResMut<LastFrameReport>,
) {
    if frames.is_empty() {
        return;
    }
    let mut rig = EcsRig {
        root: current_root(&roots),
        queries: &mut queries,
    };
    for PoseFrameReceived(frame) in frames.read() {
        last.0 = retargeter.0.on_frame(&mut rig, frame);
    }
}

//! Temporal smoothing of joint orientations.
//!
//! Called once per received frame per joint, so `factor` is relative to the
//! frame arrival rate, not the display refresh rate.

use glam::Quat;

use crate::rig::AvatarRig;

/// Slerp the live joint toward `target` by `factor` (0 keeps, 1 snaps).
///
/// Returns the orientation written to the joint, or `None` when the host has
/// no live state for it.
pub fn blend_joint<R: AvatarRig>(
    rig: &mut R,
    joint: R::Joint,
    target: Quat,
    factor: f32,
) -> Option<Quat> {
    let current = rig.joint_rotation(joint)?;
    let next = current.slerp(target, factor.clamp(0.0, 1.0)).normalize();
    rig.set_joint_rotation(joint, next);
    Some(next)
}

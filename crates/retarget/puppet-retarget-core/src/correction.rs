//! Orientation correction: one scalar angle in, one joint orientation out.

use glam::Quat;

use crate::config::RigProfile;
use crate::joint::JointKey;

/// Target orientation for `key` given a frame angle in degrees.
///
/// The live rotation is `angle * sign` about the joint's axis. When the joint
/// has a bind-pose offset `O` the result is `O * live`: the offset is applied
/// first, the live rotation second.
pub fn compute_target(profile: &RigProfile, key: JointKey, angle_degrees: f32) -> Quat {
    let radians = (angle_degrees * profile.sign(key)).to_radians();
    let axis = profile.axis(key).normalize_or_zero();
    let live = if axis == glam::Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_axis_angle(axis, radians)
    };

    match profile.offset(key) {
        Some(offset) => offset * live,
        None => live,
    }
}

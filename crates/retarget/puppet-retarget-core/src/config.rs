//! Retargeting configuration: rig profile tables, smoothing and root motion tuning.
//!
//! Everything here is static data. The default profile is compiled in (see
//! [`crate::profile`]); remapping to another rig means building another
//! [`RigProfile`], not loading a file.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::joint::JointKey;

/// Bind-pose correction expressed as intrinsic XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerXyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerXyz {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

/// Per-joint correction. Every field is optional; unset fields fall back to the
/// profile defaults (profile axis, sign +1, no offset).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointCorrection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<EulerXyz>,
}

impl JointCorrection {
    pub const NONE: JointCorrection = JointCorrection {
        axis: None,
        sign: None,
        offset: None,
    };

    pub const fn signed(sign: f32) -> Self {
        Self {
            axis: None,
            sign: Some(sign),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: EulerXyz) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = Some(axis);
        self
    }
}

/// How the dispatcher drives a bound joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JointDrive {
    /// Driven by the joint's angle in each incoming frame.
    #[default]
    Pose,
    /// Static override: skipped by the per-key pose loop and pinned to a fixed
    /// angle on every frame instead (twist and hand joints).
    StaticOverride { angle: f32 },
}

/// One row of the rig profile: a semantic key bound to a skeleton node name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointBinding {
    pub key: JointKey,
    pub bone: String,
    #[serde(default)]
    pub drive: JointDrive,
    #[serde(default)]
    pub correction: JointCorrection,
}

impl JointBinding {
    pub fn pose(key: JointKey, bone: impl Into<String>, correction: JointCorrection) -> Self {
        Self {
            key,
            bone: bone.into(),
            drive: JointDrive::Pose,
            correction,
        }
    }

    pub fn pinned(key: JointKey, bone: impl Into<String>, angle: f32) -> Self {
        Self {
            key,
            bone: bone.into(),
            drive: JointDrive::StaticOverride { angle },
            correction: JointCorrection::NONE,
        }
    }
}

/// Static joint-to-bone table plus corrections for one authored rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigProfile {
    pub name: String,
    /// Rotation axis used when a joint has no axis override (model-space depth axis).
    pub default_axis: Vec3,
    pub joints: Vec<JointBinding>,
}

impl RigProfile {
    pub fn binding(&self, key: JointKey) -> Option<&JointBinding> {
        self.joints.iter().find(|b| b.key == key)
    }

    pub fn correction(&self, key: JointKey) -> JointCorrection {
        self.binding(key)
            .map(|b| b.correction)
            .unwrap_or(JointCorrection::NONE)
    }

    pub fn axis(&self, key: JointKey) -> Vec3 {
        self.correction(key).axis.unwrap_or(self.default_axis)
    }

    pub fn sign(&self, key: JointKey) -> f32 {
        self.correction(key).sign.unwrap_or(1.0)
    }

    pub fn offset(&self, key: JointKey) -> Option<Quat> {
        self.correction(key).offset.map(EulerXyz::to_quat)
    }

    /// Bindings driven by frame angles, in table order.
    pub fn pose_driven(&self) -> impl Iterator<Item = &JointBinding> {
        self.joints.iter().filter(|b| b.drive == JointDrive::Pose)
    }

    /// Static override bindings with their fixed angle, in table order.
    pub fn static_overrides(&self) -> impl Iterator<Item = (&JointBinding, f32)> {
        self.joints.iter().filter_map(|b| match b.drive {
            JointDrive::StaticOverride { angle } => Some((b, angle)),
            JointDrive::Pose => None,
        })
    }
}

impl Default for RigProfile {
    fn default() -> Self {
        crate::profile::cc_base()
    }
}

/// Root translation tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMotionConfig {
    /// World units per unit of normalized screen offset from center.
    pub sensitivity: f32,
    /// Invert left/right so the character mirrors the viewer.
    pub mirror: bool,
    /// Fraction of the remaining distance covered per received frame.
    pub damping: f32,
    /// Drive vertical translation as well (off by default).
    pub vertical: bool,
    /// Scale for the vertical axis. Negative because screen y grows downward.
    pub vertical_sensitivity: f32,
}

impl RootMotionConfig {
    #[inline]
    pub fn mirror_sign(&self) -> f32 {
        if self.mirror {
            -1.0
        } else {
            1.0
        }
    }
}

impl Default for RootMotionConfig {
    fn default() -> Self {
        Self {
            sensitivity: 5.0,
            mirror: true,
            damping: 0.1,
            vertical: false,
            vertical_sensitivity: -5.0,
        }
    }
}

/// Top-level configuration for a [`crate::Retargeter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Slerp factor toward the target orientation per received frame.
    pub slerp_factor: f32,
    pub root_motion: RootMotionConfig,
    pub profile: RigProfile,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            slerp_factor: 0.6,
            root_motion: RootMotionConfig::default(),
            profile: RigProfile::default(),
        }
    }
}

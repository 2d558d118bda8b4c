//! Puppet retargeting core (engine-agnostic)
//!
//! Maps a rig-agnostic pose vocabulary (one angle per limb plus an optional
//! root position) onto the joints of one specific skeleton:
//! - [`registry`]: semantic joint keys resolved to live nodes, tolerant of missing bones
//! - [`correction`]: per-joint axis, sign and bind-pose offset composed into a target
//! - [`smoothing`] and [`root_motion`]: damped application to the live rig
//! - [`retargeter`]: the context object that dispatches frames
//!
//! Hosts implement [`AvatarRig`] over their own scene graph; [`MemoryRig`] is a
//! standalone implementation for tools and tests.

pub mod config;
pub mod correction;
pub mod frame;
pub mod joint;
pub mod profile;
pub mod registry;
pub mod retargeter;
pub mod rig;
pub mod root_motion;
pub mod scene;
pub mod smoothing;

pub use config::{
    EulerXyz, JointBinding, JointCorrection, JointDrive, RetargetConfig, RigProfile,
    RootMotionConfig,
};
pub use correction::compute_target;
pub use frame::{FrameError, JointSample, PoseFrame, RootPosition};
pub use joint::{JointKey, UnknownJointKey};
pub use registry::{BoneBinding, BoneRegistry, LookupStrategy, ResolvedFrom};
pub use retargeter::{FrameReport, Retargeter};
pub use rig::{
    AvatarRig, MemoryRig, NodeDescription, NodeDescriptionKind, NodeId, RigDescriptionError,
};
pub use scene::{NodeKind, RigInventory, SceneNode, SkeletonJoint, SkinInventory};

pub use glam::{Quat, Vec3};

//! Retargeter: owns the configuration and the bone registry, and dispatches
//! pose frames onto a live [`AvatarRig`].

use glam::Quat;

use crate::config::RetargetConfig;
use crate::correction::compute_target;
use crate::frame::{PoseFrame, RootPosition};
use crate::joint::JointKey;
use crate::registry::BoneRegistry;
use crate::rig::AvatarRig;
use crate::root_motion::step_root;
use crate::scene::SceneNode;
use crate::smoothing::blend_joint;

/// What a single [`Retargeter::on_frame`] call did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Pose-driven joints written from the frame, in profile order.
    pub applied: Vec<JointKey>,
    /// Static override joints pinned this frame.
    pub pinned: Vec<JointKey>,
    /// Joints present in the frame and the profile but absent from the rig.
    pub unresolved: Vec<JointKey>,
    pub root_moved: bool,
    /// False when no avatar was loaded; nothing was touched.
    pub rig_ready: bool,
}

/// Per-avatar retargeting context.
///
/// `J` is the host's joint handle type. The registry is built lazily on the
/// first frame, or eagerly via [`Retargeter::resolve`] when the host knows the
/// rig just finished loading.
#[derive(Clone, Debug)]
pub struct Retargeter<J> {
    config: RetargetConfig,
    registry: Option<BoneRegistry<J>>,
}

impl<J: Copy + Eq + std::fmt::Debug> Retargeter<J> {
    pub fn new(config: RetargetConfig) -> Self {
        Self {
            config,
            registry: None,
        }
    }

    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    pub fn registry(&self) -> Option<&BoneRegistry<J>> {
        self.registry.as_ref()
    }

    /// (Re)build the registry for a freshly loaded rig.
    pub fn resolve(&mut self, scene: &SceneNode<J>) -> &BoneRegistry<J> {
        self.registry
            .insert(BoneRegistry::resolve(scene, &self.config.profile))
    }

    /// Drop the registry, e.g. when the rig is unloaded or about to be replaced.
    pub fn invalidate(&mut self) {
        self.registry = None;
    }

    /// Pure correction step for `key`; see [`compute_target`].
    pub fn compute_target(&self, key: JointKey, angle_degrees: f32) -> Quat {
        compute_target(&self.config.profile, key, angle_degrees)
    }

    /// Smooth the joint bound to `key` toward the corrected target for `angle_degrees`.
    ///
    /// A no-op (returning `None`) when the registry is not built or the joint is
    /// not present in the rig.
    pub fn apply<R>(&self, rig: &mut R, key: JointKey, angle_degrees: f32) -> Option<Quat>
    where
        R: AvatarRig<Joint = J>,
    {
        let handle = self.registry.as_ref()?.handle(key)?;
        let target = self.compute_target(key, angle_degrees);
        blend_joint(rig, handle, target, self.config.slerp_factor)
    }

    /// Damp the avatar root toward the translation for a normalized position.
    pub fn apply_root_position<R>(&self, rig: &mut R, pos: RootPosition) -> bool
    where
        R: AvatarRig<Joint = J>,
    {
        let Some(current) = rig.root_translation() else {
            return false;
        };
        rig.set_root_translation(step_root(&self.config.root_motion, current, pos));
        true
    }

    /// Apply one pose frame across all mapped joints.
    pub fn on_frame<R>(&mut self, rig: &mut R, frame: &PoseFrame) -> FrameReport
    where
        R: AvatarRig<Joint = J>,
    {
        let mut report = FrameReport::default();

        if self.registry.is_none() {
            match rig.scene() {
                Some(scene) => {
                    self.resolve(&scene);
                }
                None => {
                    log::debug!("pose frame ignored: no avatar loaded");
                    return report;
                }
            }
        }
        report.rig_ready = true;

        let Some(registry) = self.registry.as_ref() else {
            return report;
        };

        for binding in self.config.profile.pose_driven() {
            let Some(sample) = frame.sample(binding.key) else {
                continue;
            };
            match registry.handle(binding.key) {
                Some(handle) => {
                    let target = compute_target(
                        &self.config.profile,
                        binding.key,
                        sample.angle_or_zero(),
                    );
                    if blend_joint(rig, handle, target, self.config.slerp_factor).is_some() {
                        report.applied.push(binding.key);
                    }
                }
                None => report.unresolved.push(binding.key),
            }
        }

        for (binding, angle) in self.config.profile.static_overrides() {
            if let Some(handle) = registry.handle(binding.key) {
                let target = compute_target(&self.config.profile, binding.key, angle);
                if blend_joint(rig, handle, target, self.config.slerp_factor).is_some() {
                    report.pinned.push(binding.key);
                }
            }
        }

        if let Some(pos) = frame.root_position {
            report.root_moved = self.apply_root_position(rig, pos);
        }

        log::debug!(
            "pose frame: {} applied, {} pinned, {} unresolved, root_moved={}",
            report.applied.len(),
            report.pinned.len(),
            report.unresolved.len(),
            report.root_moved
        );
        report
    }
}

impl<J: Copy + Eq + std::fmt::Debug> Default for Retargeter<J> {
    fn default() -> Self {
        Self::new(RetargetConfig::default())
    }
}

//! Bone registry: semantic joint keys resolved to live skeleton handles.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::RigProfile;
use crate::joint::JointKey;
use crate::scene::{SceneNode, SkeletonJoint};

/// Which lookup the registry used for this rig.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupStrategy {
    /// The rig has a skinned mesh; its joint list was searched first.
    Skeleton,
    /// No skeleton; the whole node hierarchy was searched.
    SceneGraph,
}

/// Where a resolved handle was found.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedFrom {
    Skeleton,
    SceneGraph,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoneBinding<H> {
    pub handle: H,
    pub from: ResolvedFrom,
}

/// Result of resolving a rig profile against one loaded rig.
///
/// Every key of the profile has an entry; `None` means the configured node name
/// does not exist in this rig and every operation on that key is a no-op.
#[derive(Clone, Debug)]
pub struct BoneRegistry<H> {
    strategy: LookupStrategy,
    bones: HashMap<JointKey, Option<BoneBinding<H>>>,
}

impl<H: Copy> BoneRegistry<H> {
    /// Resolve every binding of `profile` by exact node name within `root`.
    pub fn resolve(root: &SceneNode<H>, profile: &RigProfile) -> Self {
        let skeleton: Option<&[SkeletonJoint<H>]> = root.find_skeleton().map(|(mesh, joints)| {
            log::debug!(
                "bone registry: using skeleton of skinned mesh '{}' ({} joints)",
                mesh.name,
                joints.len()
            );
            joints
        });
        let strategy = if skeleton.is_some() {
            LookupStrategy::Skeleton
        } else {
            log::debug!("bone registry: no skinned mesh, falling back to node lookup");
            LookupStrategy::SceneGraph
        };

        let mut bones = HashMap::with_capacity(profile.joints.len());
        for binding in &profile.joints {
            let from_skeleton = skeleton.and_then(|joints| {
                joints
                    .iter()
                    .find(|j| j.name == binding.bone)
                    .map(|j| BoneBinding {
                        handle: j.handle,
                        from: ResolvedFrom::Skeleton,
                    })
            });
            let resolved = from_skeleton.or_else(|| {
                root.find_by_name(&binding.bone).map(|n| BoneBinding {
                    handle: n.handle,
                    from: ResolvedFrom::SceneGraph,
                })
            });
            if resolved.is_none() {
                log::warn!(
                    "bone '{}' for joint '{}' not found in rig '{}'",
                    binding.bone,
                    binding.key,
                    root.name
                );
            }
            bones.insert(binding.key, resolved);
        }

        let registry = Self { strategy, bones };
        log::info!(
            "bone registry resolved {}/{} joints ({:?} lookup)",
            registry.resolved_count(),
            registry.bones.len(),
            strategy
        );
        registry
    }

    /// Live handle for `key`, if the profile binds it and the rig has that node.
    #[inline]
    pub fn handle(&self, key: JointKey) -> Option<H> {
        self.bones.get(&key).copied().flatten().map(|b| b.handle)
    }

    pub fn binding(&self, key: JointKey) -> Option<BoneBinding<H>> {
        self.bones.get(&key).copied().flatten()
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    pub fn resolved_count(&self) -> usize {
        self.bones.values().filter(|b| b.is_some()).count()
    }

    /// Configured keys whose node was not found, in vocabulary order.
    pub fn missing(&self) -> Vec<JointKey> {
        let mut keys: Vec<JointKey> = self
            .bones
            .iter()
            .filter(|(_, b)| b.is_none())
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }
}

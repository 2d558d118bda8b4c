//! Live rig access and an in-memory rig host.
//!
//! [`AvatarRig`] is the seam between the retargeter and whatever owns the live
//! joint state (a Bevy world, a test harness). [`MemoryRig`] is a plain arena
//! implementation, loadable from a JSON node description.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::{NodeKind, SceneNode, SkeletonJoint};

/// Host-owned live rig.
///
/// `scene()` returns `None` while no avatar (real or placeholder) is loaded;
/// retargeting is then a no-op.
pub trait AvatarRig {
    type Joint: Copy + Eq + std::fmt::Debug;

    fn scene(&self) -> Option<SceneNode<Self::Joint>>;
    fn joint_rotation(&self, joint: Self::Joint) -> Option<Quat>;
    fn set_joint_rotation(&mut self, joint: Self::Joint, rotation: Quat);
    fn root_translation(&self) -> Option<Vec3>;
    fn set_root_translation(&mut self, translation: Vec3);
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDescriptionKind {
    #[default]
    Group,
    Mesh,
    SkinnedMesh,
    Bone,
}

/// Serializable description of a rig hierarchy (used by fixtures and tools).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    #[serde(default)]
    pub kind: NodeDescriptionKind,
    /// Skeleton joint names, for `skinned_mesh` nodes. Resolved by exact name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Quat>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Error)]
pub enum RigDescriptionError {
    #[error("rig description json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("skinned mesh '{mesh}' lists joint '{joint}' which is not a node of the rig")]
    UnknownJoint { mesh: String, joint: String },
    #[error("node '{0}' lists joints but is not a skinned mesh")]
    JointsOnNonSkinnedNode(String),
}

#[derive(Clone, Debug)]
struct MemoryNode {
    name: String,
    kind: NodeDescriptionKind,
    joints: Vec<NodeId>,
    translation: Vec3,
    rotation: Quat,
    children: Vec<NodeId>,
}

/// Arena-backed rig. Node 0 is the avatar root.
#[derive(Clone, Debug, Default)]
pub struct MemoryRig {
    nodes: Vec<MemoryNode>,
}

impl MemoryRig {
    /// A host with no avatar loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, RigDescriptionError> {
        let desc: NodeDescription = serde_json::from_str(json)?;
        Self::from_description(&desc)
    }

    pub fn from_description(desc: &NodeDescription) -> Result<Self, RigDescriptionError> {
        let mut rig = Self::default();
        let mut pending_joints: Vec<(NodeId, &NodeDescription)> = Vec::new();
        rig.push(desc, &mut pending_joints)?;

        for (id, node_desc) in pending_joints {
            let mut joints = Vec::with_capacity(node_desc.joints.len());
            for joint in &node_desc.joints {
                let jid = rig.find(joint).ok_or_else(|| RigDescriptionError::UnknownJoint {
                    mesh: node_desc.name.clone(),
                    joint: joint.clone(),
                })?;
                joints.push(jid);
            }
            rig.nodes[id.0 as usize].joints = joints;
        }
        Ok(rig)
    }

    fn push<'a>(
        &mut self,
        desc: &'a NodeDescription,
        pending: &mut Vec<(NodeId, &'a NodeDescription)>,
    ) -> Result<NodeId, RigDescriptionError> {
        if !desc.joints.is_empty() && desc.kind != NodeDescriptionKind::SkinnedMesh {
            return Err(RigDescriptionError::JointsOnNonSkinnedNode(desc.name.clone()));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MemoryNode {
            name: desc.name.clone(),
            kind: desc.kind,
            joints: Vec::new(),
            translation: desc.translation.unwrap_or(Vec3::ZERO),
            rotation: desc.rotation.unwrap_or(Quat::IDENTITY),
            children: Vec::new(),
        });
        if desc.kind == NodeDescriptionKind::SkinnedMesh {
            pending.push((id, desc));
        }
        for child in &desc.children {
            let cid = self.push(child, pending)?;
            self.nodes[id.0 as usize].children.push(cid);
        }
        Ok(id)
    }

    pub fn is_loaded(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.is_loaded().then_some(NodeId(0))
    }

    /// First node named exactly `name`, in pre-order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        // arena order is pre-order
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0 as usize).map(|n| n.name.as_str())
    }

    pub fn rotation(&self, id: NodeId) -> Option<Quat> {
        self.nodes.get(id.0 as usize).map(|n| n.rotation)
    }

    pub fn translation(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id.0 as usize).map(|n| n.translation)
    }

    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) {
        if let Some(n) = self.nodes.get_mut(id.0 as usize) {
            n.translation = translation;
        }
    }

    /// Snapshot of every node's rotation, indexed by `NodeId`.
    pub fn rotations(&self) -> Vec<Quat> {
        self.nodes.iter().map(|n| n.rotation).collect()
    }

    fn snapshot(&self, id: NodeId) -> SceneNode<NodeId> {
        let node = &self.nodes[id.0 as usize];
        let kind = match node.kind {
            NodeDescriptionKind::Group => NodeKind::Group,
            NodeDescriptionKind::Mesh => NodeKind::Mesh,
            NodeDescriptionKind::Bone => NodeKind::Bone,
            NodeDescriptionKind::SkinnedMesh => NodeKind::SkinnedMesh {
                joints: node
                    .joints
                    .iter()
                    .map(|&j| SkeletonJoint {
                        handle: j,
                        name: self.nodes[j.0 as usize].name.clone(),
                    })
                    .collect(),
            },
        };
        SceneNode {
            handle: id,
            name: node.name.clone(),
            kind,
            children: node.children.iter().map(|&c| self.snapshot(c)).collect(),
        }
    }
}

impl AvatarRig for MemoryRig {
    type Joint = NodeId;

    fn scene(&self) -> Option<SceneNode<NodeId>> {
        self.root().map(|root| self.snapshot(root))
    }

    fn joint_rotation(&self, joint: NodeId) -> Option<Quat> {
        self.rotation(joint)
    }

    fn set_joint_rotation(&mut self, joint: NodeId, rotation: Quat) {
        if let Some(n) = self.nodes.get_mut(joint.0 as usize) {
            n.rotation = rotation;
        }
    }

    fn root_translation(&self) -> Option<Vec3> {
        self.root().and_then(|r| self.translation(r))
    }

    fn set_root_translation(&mut self, translation: Vec3) {
        if let Some(r) = self.root() {
            self.set_translation(r, translation);
        }
    }
}

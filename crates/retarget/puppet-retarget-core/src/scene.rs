//! Engine-agnostic snapshot of a loaded rig's node hierarchy.
//!
//! Hosts (the Bevy adapter, the in-memory rig) build a [`SceneNode`] tree whose
//! handles `H` point back at their own live nodes. The registry only reads
//! names and kinds; it never mutates the tree.

use serde::{Deserialize, Serialize};

/// A skeleton joint as listed by a skinned mesh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonJoint<H> {
    pub handle: H,
    pub name: String,
}

/// What a scene-graph node is, as far as retargeting cares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind<H> {
    Group,
    Mesh,
    /// Mesh skinned to an explicit joint list. The list is authoritative for skinning.
    SkinnedMesh { joints: Vec<SkeletonJoint<H>> },
    Bone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNode<H> {
    pub handle: H,
    pub name: String,
    pub kind: NodeKind<H>,
    pub children: Vec<SceneNode<H>>,
}

impl<H> SceneNode<H> {
    pub fn new(handle: H, name: impl Into<String>, kind: NodeKind<H>) -> Self {
        Self {
            handle,
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SceneNode<H>) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first, pre-order search returning the first node matching `pred`.
    pub fn find_first<F>(&self, pred: F) -> Option<&SceneNode<H>>
    where
        F: Fn(&SceneNode<H>) -> bool,
    {
        fn visit<'a, H, F>(node: &'a SceneNode<H>, pred: &F) -> Option<&'a SceneNode<H>>
        where
            F: Fn(&SceneNode<H>) -> bool,
        {
            if pred(node) {
                return Some(node);
            }
            node.children.iter().find_map(|c| visit(c, pred))
        }
        visit(self, &pred)
    }

    /// Exact-name lookup anywhere in the hierarchy, including this node.
    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode<H>> {
        self.find_first(|n| n.name == name)
    }

    /// First skinned mesh that carries a non-empty joint list.
    pub fn find_skeleton(&self) -> Option<(&SceneNode<H>, &[SkeletonJoint<H>])> {
        let node = self.find_first(|n| {
            matches!(&n.kind, NodeKind::SkinnedMesh { joints } if !joints.is_empty())
        })?;
        match &node.kind {
            NodeKind::SkinnedMesh { joints } => Some((node, joints.as_slice())),
            _ => None,
        }
    }

    /// Calls `f` for every node, pre-order.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&SceneNode<H>),
    {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Names of nodes, skins and bones, for authoring a bone table.
    pub fn inventory(&self) -> RigInventory {
        let mut inv = RigInventory::default();
        self.walk(&mut |node| {
            inv.nodes.push(node.name.clone());
            match &node.kind {
                NodeKind::Bone => inv.bones.push(node.name.clone()),
                NodeKind::SkinnedMesh { joints } => inv.skins.push(SkinInventory {
                    mesh: node.name.clone(),
                    joints: joints.iter().map(|j| j.name.clone()).collect(),
                }),
                NodeKind::Group | NodeKind::Mesh => {}
            }
        });
        inv
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinInventory {
    pub mesh: String,
    pub joints: Vec<String>,
}

/// Flat listing of a rig's names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigInventory {
    pub nodes: Vec<String>,
    pub skins: Vec<SkinInventory>,
    pub bones: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SceneNode<u32> {
        SceneNode::new(0, "root", NodeKind::Group)
            .with_child(
                SceneNode::new(1, "Armature", NodeKind::Group)
                    .with_child(SceneNode::new(2, "Hip", NodeKind::Bone).with_child(
                        SceneNode::new(3, "Spine", NodeKind::Bone),
                    )),
            )
            .with_child(SceneNode::new(
                4,
                "Body",
                NodeKind::SkinnedMesh {
                    joints: vec![
                        SkeletonJoint {
                            handle: 2,
                            name: "Hip".into(),
                        },
                        SkeletonJoint {
                            handle: 3,
                            name: "Spine".into(),
                        },
                    ],
                },
            ))
            .with_child(SceneNode::new(5, "Spine", NodeKind::Mesh))
    }

    #[test]
    fn find_first_is_preorder() {
        let root = sample();
        // the bone under Armature comes before the mesh with the same name
        assert_eq!(root.find_by_name("Spine").map(|n| n.handle), Some(3));
    }

    #[test]
    fn finds_skeleton_joint_list() {
        let root = sample();
        let (mesh, joints) = root.find_skeleton().expect("skinned mesh");
        assert_eq!(mesh.name, "Body");
        assert_eq!(joints.len(), 2);
    }

    #[test]
    fn empty_skin_is_not_a_skeleton() {
        let root = SceneNode::new(0u32, "root", NodeKind::Group).with_child(SceneNode::new(
            1,
            "Body",
            NodeKind::SkinnedMesh { joints: vec![] },
        ));
        assert!(root.find_skeleton().is_none());
    }

    #[test]
    fn inventory_lists_everything() {
        let inv = sample().inventory();
        assert_eq!(inv.nodes, ["root", "Armature", "Hip", "Spine", "Body", "Spine"]);
        assert_eq!(inv.bones, ["Hip", "Spine"]);
        assert_eq!(inv.skins.len(), 1);
        assert_eq!(inv.skins[0].joints, ["Hip", "Spine"]);
    }
}

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::mesh::skinning::SkinnedMesh;
use bevy::utils::HashSet;
use puppet_retarget_core::{
    AvatarRig, NodeKind, Quat as RigQuat, SceneNode, SkeletonJoint, Vec3 as RigVec3,
};

/// World access needed to snapshot and drive a rig.
#[derive(SystemParam)]
pub struct RigQueries<'w, 's> {
    pub names: Query<'w, 's, &'static Name>,
    pub children: Query<'w, 's, &'static Children>,
    pub skins: Query<'w, 's, &'static SkinnedMesh>,
    pub meshes: Query<'w, 's, (), With<Handle<Mesh>>>,
    pub transforms: Query<'w, 's, &'static mut Transform>,
}

fn entity_name(q: &RigQueries, e: Entity) -> String {
    q.names
        .get(e)
        .map(|n| n.as_str().to_string())
        .unwrap_or_default()
}

/// Snapshot the hierarchy under `root` as a typed scene graph.
///
/// Entities listed by any `SkinnedMesh` are reported as bones.
pub fn build_scene(q: &RigQueries, root: Entity) -> SceneNode<Entity> {
    let bones: HashSet<Entity> = q
        .skins
        .iter()
        .flat_map(|skin| skin.joints.iter().copied())
        .collect();
    snapshot(q, &bones, root)
}

fn snapshot(q: &RigQueries, bones: &HashSet<Entity>, e: Entity) -> SceneNode<Entity> {
    let kind = if let Ok(skin) = q.skins.get(e) {
        NodeKind::SkinnedMesh {
            joints: skin
                .joints
                .iter()
                .map(|&j| SkeletonJoint {
                    handle: j,
                    name: entity_name(q, j),
                })
                .collect(),
        }
    } else if q.meshes.contains(e) {
        NodeKind::Mesh
    } else if bones.contains(&e) {
        NodeKind::Bone
    } else {
        NodeKind::Group
    };

    let children = q
        .children
        .get(e)
        .map(|cs| cs.iter().map(|&c| snapshot(q, bones, c)).collect())
        .unwrap_or_default();

    SceneNode {
        handle: e,
        name: entity_name(q, e),
        kind,
        children,
    }
}

/// [`AvatarRig`] over the ECS world for one frame's worth of writes.
pub struct EcsRig<'a, 'w, 's> {
    pub root: Option<Entity>,
    pub queries: &'a mut RigQueries<'w, 's>,
}

impl AvatarRig for EcsRig<'_, '_, '_> {
    type Joint = Entity;

    fn scene(&self) -> Option<SceneNode<Entity>> {
        self.root.map(|root| build_scene(&*self.queries, root))
    }

    fn joint_rotation(&self, joint: Entity) -> Option<RigQuat> {
        let t = self.queries.transforms.get(joint).ok()?;
        Some(RigQuat::from_array(t.rotation.to_array()))
    }

    fn set_joint_rotation(&mut self, joint: Entity, rotation: RigQuat) {
        if let Ok(mut t) = self.queries.transforms.get_mut(joint) {
            t.rotation = Quat::from_array(rotation.to_array());
        }
    }

    fn root_translation(&self) -> Option<RigVec3> {
        let t = self.queries.transforms.get(self.root?).ok()?;
        Some(RigVec3::from_array(t.translation.to_array()))
    }

    fn set_root_translation(&mut self, translation: RigVec3) {
        let Some(root) = self.root else { return };
        if let Ok(mut t) = self.queries.transforms.get_mut(root) {
            t.translation = Vec3::from_array(translation.to_array());
        }
    }
}

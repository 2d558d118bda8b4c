use bevy::prelude::*;

/// Marker component designating the avatar root.
///
/// Root motion is written to this entity's `Transform.translation`; bones are
/// looked up among its descendants.
#[derive(Component, Debug, Default)]
pub struct PuppetRigRoot;

//! Built-in rig profiles.
//!
//! The sign and offset values below were tuned by hand against one Character
//! Creator export. Left/right entries are deliberately not symmetric; keep them
//! as they are unless re-tuning against the actual rig.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::config::{EulerXyz, JointBinding, JointCorrection, RigProfile};
use crate::joint::JointKey;

/// Profile for a Character Creator `CC_Base_*` skeleton exported to glTF.
///
/// Limbs rotate about the model's depth axis (+Z) so a 2D image-plane angle
/// maps onto the character as seen from the front.
pub fn cc_base() -> RigProfile {
    use JointKey::*;

    let flipped = JointCorrection::signed(-1.0);

    RigProfile {
        name: "cc_base".to_string(),
        default_axis: Vec3::Z,
        joints: vec![
            JointBinding::pose(
                Head,
                "CC_Base_Head_038",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, PI)),
            ),
            JointBinding::pose(Hip, "CC_Base_Hip_02", JointCorrection::NONE),
            JointBinding::pose(
                LeftUpperArm,
                "CC_Base_L_Upperarm_050",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, 0.0)),
            ),
            JointBinding::pose(
                LeftLowerArm,
                "CC_Base_L_Forearm_051",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, 0.0)),
            ),
            JointBinding::pose(
                RightUpperArm,
                "CC_Base_R_Upperarm_078",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, PI)),
            ),
            JointBinding::pose(
                RightLowerArm,
                "CC_Base_R_Forearm_079",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, PI)),
            ),
            JointBinding::pose(
                LeftUpperLeg,
                "CC_Base_L_Thigh_04",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, -FRAC_PI_2)),
            ),
            JointBinding::pose(
                LeftLowerLeg,
                "CC_Base_L_Calf_05",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, FRAC_PI_2)),
            ),
            JointBinding::pose(
                RightUpperLeg,
                "CC_Base_R_Thigh_018",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, -FRAC_PI_2)),
            ),
            JointBinding::pose(
                RightLowerLeg,
                "CC_Base_R_Calf_019",
                flipped.with_offset(EulerXyz::new(0.0, 0.0, FRAC_PI_2)),
            ),
            // Hands and forearm twists are pinned to rest; their frame angles are ignored.
            JointBinding::pinned(LeftHand, "CC_Base_L_Hand_054", 0.0),
            JointBinding::pinned(RightHand, "CC_Base_R_Hand_082", 0.0),
            JointBinding::pinned(LeftForearmTwist, "CC_Base_L_ForearmTwist01_052", 0.0),
            JointBinding::pinned(RightForearmTwist, "CC_Base_R_ForearmTwist01_080", 0.0),
        ],
    }
}

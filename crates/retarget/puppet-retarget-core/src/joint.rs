//! Semantic joint vocabulary shared by the pose source and the rig profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body part named by the pose vocabulary.
///
/// Wire names are snake_case (`left_upper_arm`, `head`, ...). Keys the pose
/// source sends that are not listed here are ignored by the frame decoder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointKey {
    Head,
    Hip,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
    LeftHand,
    RightHand,
    LeftForearmTwist,
    RightForearmTwist,
}

impl JointKey {
    pub const ALL: [JointKey; 14] = [
        JointKey::Head,
        JointKey::Hip,
        JointKey::LeftUpperArm,
        JointKey::LeftLowerArm,
        JointKey::RightUpperArm,
        JointKey::RightLowerArm,
        JointKey::LeftUpperLeg,
        JointKey::LeftLowerLeg,
        JointKey::RightUpperLeg,
        JointKey::RightLowerLeg,
        JointKey::LeftHand,
        JointKey::RightHand,
        JointKey::LeftForearmTwist,
        JointKey::RightForearmTwist,
    ];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            JointKey::Head => "head",
            JointKey::Hip => "hip",
            JointKey::LeftUpperArm => "left_upper_arm",
            JointKey::LeftLowerArm => "left_lower_arm",
            JointKey::RightUpperArm => "right_upper_arm",
            JointKey::RightLowerArm => "right_lower_arm",
            JointKey::LeftUpperLeg => "left_upper_leg",
            JointKey::LeftLowerLeg => "left_lower_leg",
            JointKey::RightUpperLeg => "right_upper_leg",
            JointKey::RightLowerLeg => "right_lower_leg",
            JointKey::LeftHand => "left_hand",
            JointKey::RightHand => "right_hand",
            JointKey::LeftForearmTwist => "left_forearm_twist",
            JointKey::RightForearmTwist => "right_forearm_twist",
        }
    }
}

impl fmt::Display for JointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a wire key is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown joint key '{0}'")]
pub struct UnknownJointKey(pub String);

impl FromStr for JointKey {
    type Err = UnknownJointKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownJointKey(s.to_string()))
    }
}

//! Pose frames: the per-limb angle snapshot carried by a `pose` message.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::joint::JointKey;

/// Normalized screen-space position of the character root, both axes in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RootPosition {
    pub x: f32,
    pub y: f32,
}

/// One joint's measurement. A missing angle is treated as 0 when applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    #[serde(default)]
    pub angle: Option<f32>,
}

impl JointSample {
    pub fn degrees(angle: f32) -> Self {
        Self { angle: Some(angle) }
    }

    #[inline]
    pub fn angle_or_zero(&self) -> f32 {
        self.angle.unwrap_or(0.0)
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("pose payload must be a JSON object")]
    NotAnObject,
    #[error("joint '{key}': {source}")]
    Joint {
        key: JointKey,
        #[source]
        source: serde_json::Error,
    },
    #[error("root_position: {0}")]
    RootPosition(#[source] serde_json::Error),
    #[error("timestamp must be a number")]
    Timestamp,
}

/// Snapshot of the pose vocabulary. May be partial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    pub joints: HashMap<JointKey, JointSample>,
    pub root_position: Option<RootPosition>,
    /// Producer timestamp in seconds, when sent.
    pub timestamp: Option<f64>,
}

impl PoseFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle(mut self, key: JointKey, degrees: f32) -> Self {
        self.joints.insert(key, JointSample::degrees(degrees));
        self
    }

    pub fn with_root(mut self, x: f32, y: f32) -> Self {
        self.root_position = Some(RootPosition { x, y });
        self
    }

    pub fn sample(&self, key: JointKey) -> Option<&JointSample> {
        self.joints.get(&key)
    }

    /// Decode a `pose` message payload.
    ///
    /// Keys outside the joint vocabulary are skipped without being inspected,
    /// so producers may send extra data (`length`, `*_pos`, ...). A known key
    /// with the wrong shape rejects the whole frame.
    pub fn from_payload(payload: &Value) -> Result<Self, FrameError> {
        let map = payload.as_object().ok_or(FrameError::NotAnObject)?;
        Self::from_map(map)
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, FrameError> {
        let mut frame = PoseFrame::new();
        for (name, value) in map {
            match name.as_str() {
                "root_position" => {
                    let pos = RootPosition::deserialize(value).map_err(FrameError::RootPosition)?;
                    frame.root_position = Some(pos);
                }
                "timestamp" => {
                    frame.timestamp = Some(value.as_f64().ok_or(FrameError::Timestamp)?);
                }
                other => {
                    let Ok(key) = other.parse::<JointKey>() else {
                        continue;
                    };
                    let sample = JointSample::deserialize(value)
                        .map_err(|source| FrameError::Joint { key, source })?;
                    frame.joints.insert(key, sample);
                }
            }
        }
        Ok(frame)
    }

    /// Wire payload for this frame (used by producers and test harnesses).
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        let mut keys: Vec<&JointKey> = self.joints.keys().collect();
        keys.sort_unstable();
        for key in keys {
            let sample = &self.joints[key];
            let mut entry = Map::new();
            if let Some(angle) = sample.angle {
                entry.insert("angle".into(), Value::from(angle));
            }
            map.insert(key.as_str().into(), Value::Object(entry));
        }
        if let Some(pos) = self.root_position {
            map.insert(
                "root_position".into(),
                serde_json::json!({ "x": pos.x, "y": pos.y }),
            );
        }
        if let Some(ts) = self.timestamp {
            map.insert("timestamp".into(), Value::from(ts));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_angles_root_and_timestamp() {
        let payload = json!({
            "timestamp": 1712.5,
            "head": { "angle": -12.5, "pos": [1.0, 2.0] },
            "left_upper_arm": { "angle": 80, "length": 120.0 },
            "root_position": { "x": 0.25, "y": 0.75 }
        });
        let frame = PoseFrame::from_payload(&payload).unwrap();
        assert_eq!(frame.sample(JointKey::Head), Some(&JointSample::degrees(-12.5)));
        assert_eq!(frame.sample(JointKey::LeftUpperArm).unwrap().angle, Some(80.0));
        assert_eq!(frame.root_position, Some(RootPosition { x: 0.25, y: 0.75 }));
        assert_eq!(frame.timestamp, Some(1712.5));
    }

    #[test]
    fn unknown_keys_are_ignored_whatever_their_shape() {
        let payload = json!({
            "left_sh_pos": [0.4, 0.3],
            "tail": { "angle": "wag" },
            "hip": { "angle": 3.0 }
        });
        let frame = PoseFrame::from_payload(&payload).unwrap();
        assert_eq!(frame.joints.len(), 1);
        assert!(frame.sample(JointKey::Hip).is_some());
    }

    #[test]
    fn missing_angle_defaults_to_zero() {
        let frame = PoseFrame::from_payload(&json!({ "head": {} })).unwrap();
        assert_eq!(frame.sample(JointKey::Head).unwrap().angle_or_zero(), 0.0);
    }

    #[test]
    fn malformed_known_fields_reject_the_frame() {
        assert!(matches!(
            PoseFrame::from_payload(&json!({ "head": { "angle": "up" } })),
            Err(FrameError::Joint { key: JointKey::Head, .. })
        ));
        assert!(matches!(
            PoseFrame::from_payload(&json!({ "root_position": { "x": 0.5 } })),
            Err(FrameError::RootPosition(_))
        ));
        assert!(matches!(
            PoseFrame::from_payload(&json!([1, 2])),
            Err(FrameError::NotAnObject)
        ));
    }

    #[test]
    fn payload_round_trips() {
        let frame = PoseFrame::new()
            .with_angle(JointKey::Head, 10.0)
            .with_angle(JointKey::RightLowerLeg, -45.0)
            .with_root(0.1, 0.9);
        let back = PoseFrame::from_payload(&frame.to_payload()).unwrap();
        assert_eq!(back, frame);
    }
}

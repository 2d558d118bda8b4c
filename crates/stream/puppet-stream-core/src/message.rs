//! Wire envelope decoding.

use puppet_retarget_core::{FrameError, PoseFrame};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const POSE_TYPE: &str = "pose";

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message has no 'type' field")]
    MissingType,
    #[error("pose message has no payload")]
    MissingPayload,
    #[error("pose payload: {0}")]
    Frame(#[from] FrameError),
}

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    Pose(PoseFrame),
    /// Any other message type. Carries the type name for logging.
    Ignored(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

pub fn decode_message(text: &str) -> Result<Inbound, MessageError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let kind = envelope.kind.ok_or(MessageError::MissingType)?;
    if kind != POSE_TYPE {
        return Ok(Inbound::Ignored(kind));
    }
    let payload = envelope.payload.ok_or(MessageError::MissingPayload)?;
    Ok(Inbound::Pose(PoseFrame::from_payload(&payload)?))
}

/// Encode a frame the way producers send it.
pub fn encode_pose(frame: &PoseFrame) -> String {
    serde_json::json!({ "type": POSE_TYPE, "payload": frame.to_payload() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use puppet_retarget_core::JointKey;

    #[test]
    fn pose_message_yields_frame() {
        let msg = serde_json::json!({
            "type": "pose",
            "payload": { "head": { "angle": 12.0 }, "root_position": { "x": 0.4, "y": 0.6 } }
        });
        let Inbound::Pose(frame) = decode_message(&msg.to_string()).unwrap() else {
            panic!("expected a pose");
        };
        assert_eq!(frame.sample(JointKey::Head).unwrap().angle, Some(12.0));
        assert!(frame.root_position.is_some());
    }

    #[test]
    fn other_types_are_ignored() {
        let out = decode_message(r#"{"type":"status","payload":{"fps":30}}"#).unwrap();
        assert_eq!(out, Inbound::Ignored("status".into()));
    }

    #[test]
    fn malformed_messages_are_errors() {
        assert!(matches!(decode_message("{oops"), Err(MessageError::Json(_))));
        assert!(matches!(
            decode_message(r#"{"payload":{}}"#),
            Err(MessageError::MissingType)
        ));
        assert!(matches!(
            decode_message(r#"{"type":"pose"}"#),
            Err(MessageError::MissingPayload)
        ));
        assert!(matches!(
            decode_message(r#"{"type":"pose","payload":{"hip":{"angle":"x"}}}"#),
            Err(MessageError::Frame(_))
        ));
    }

    #[test]
    fn encoded_pose_decodes_back() {
        let frame = PoseFrame::new().with_angle(JointKey::Hip, -4.0);
        assert_eq!(decode_message(&encode_pose(&frame)).unwrap(), Inbound::Pose(frame));
    }
}

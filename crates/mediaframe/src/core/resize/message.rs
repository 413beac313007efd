//! Cross-Frame Wire Schema
//!
//! Outbound frame-resize notifications and narrowing of inbound messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subject tag of the LMS frame-resize convention
pub const FRAME_RESIZE_SUBJECT: &str = "lti.frameResize";

/// Outbound frame-resize notification, posted to the parent with open targeting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMessage {
    pub subject: String,
    /// Desired height in whole pixels, rounded up
    pub height: u32,
}

impl FrameMessage {
    /// Builds a resize message from a measured height
    pub fn resize(height: f64) -> Self {
        let height = if height.is_finite() { height.ceil().max(0.0) } else { 0.0 };
        Self {
            subject: FRAME_RESIZE_SUBJECT.to_string(),
            height: height.min(u32::MAX as f64) as u32,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"subject":"{}","height":{}}}"#,
                FRAME_RESIZE_SUBJECT, self.height
            )
        })
    }
}

/// Inbound message narrowed to the shapes the wrapper acts on
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InboundMessage {
    /// H5P-flavored resize notification
    H5pResize,
    /// A frame-resize message (e.g. our own, reflected back); ignored
    FrameResize { height: u32 },
    /// Anything else; not an error
    Unknown,
}

impl InboundMessage {
    /// Narrows a structured message payload.
    ///
    /// Any of `type == "h5p"`, `action == "resize"`, `context == "h5p"`, or a
    /// `subject` containing `"h5p"` counts as an H5P resize request.
    pub fn classify(data: &Value) -> Self {
        let Some(obj) = data.as_object() else {
            return Self::Unknown;
        };
        let field = |key: &str| obj.get(key).and_then(Value::as_str);

        let is_h5p = field("type") == Some("h5p")
            || field("action") == Some("resize")
            || field("context") == Some("h5p")
            || field("subject").is_some_and(|s| s.contains("h5p"));
        if is_h5p {
            return Self::H5pResize;
        }

        if field("subject") == Some(FRAME_RESIZE_SUBJECT) {
            let height = obj
                .get("height")
                .and_then(Value::as_f64)
                .map(|h| FrameMessage::resize(h).height)
                .unwrap_or(0);
            return Self::FrameResize { height };
        }

        Self::Unknown
    }

    /// Narrows a message that arrived as a string (JSON-encoded or not)
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str::<Value>(raw)
            .map(|v| Self::classify(&v))
            .unwrap_or(Self::Unknown)
    }

    pub fn requests_resize(&self) -> bool {
        matches!(self, Self::H5pResize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resize_message_rounds_up() {
        let msg = FrameMessage::resize(480.2);
        assert_eq!(msg.height, 481);
        assert_eq!(msg.subject, "lti.frameResize");
        assert_eq!(msg.to_json(), r#"{"subject":"lti.frameResize","height":481}"#);
    }

    #[test]
    fn test_resize_message_clamps_degenerate_heights() {
        assert_eq!(FrameMessage::resize(-5.0).height, 0);
        assert_eq!(FrameMessage::resize(f64::NAN).height, 0);
    }

    #[test]
    fn test_classify_h5p_shapes() {
        for data in [
            json!({"type": "h5p"}),
            json!({"action": "resize", "scrollHeight": 300}),
            json!({"context": "h5p", "action": "hello"}),
            json!({"subject": "h5p.resize"}),
        ] {
            assert_eq!(InboundMessage::classify(&data), InboundMessage::H5pResize, "{}", data);
        }
    }

    #[test]
    fn test_classify_frame_resize_echo() {
        let data = json!({"subject": "lti.frameResize", "height": 320.5});
        assert_eq!(
            InboundMessage::classify(&data),
            InboundMessage::FrameResize { height: 321 }
        );
        assert!(!InboundMessage::classify(&data).requests_resize());
    }

    #[test]
    fn test_classify_unknown_shapes() {
        assert_eq!(InboundMessage::classify(&json!("hello")), InboundMessage::Unknown);
        assert_eq!(InboundMessage::classify(&json!({"type": "video"})), InboundMessage::Unknown);
        assert_eq!(InboundMessage::classify(&json!(null)), InboundMessage::Unknown);
        assert_eq!(InboundMessage::classify(&json!({"context": 5})), InboundMessage::Unknown);
    }

    #[test]
    fn test_parse_raw_strings() {
        assert_eq!(
            InboundMessage::parse(r#"{"context":"h5p","action":"prepareResize"}"#),
            InboundMessage::H5pResize
        );
        assert_eq!(InboundMessage::parse("not json"), InboundMessage::Unknown);
    }
}

//! Multi-modal content items for tool and prompt replies
//!
//! Content is the payload vocabulary of MCP responses: plain text, base64
//! images and audio, embedded resources, and resource links. Every item can
//! carry optional [`Annotations`] describing audience, priority, and
//! last-modified time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::types::Role;

/// Optional metadata attached to a content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    /// Who the content is intended for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Role>>,

    /// Importance from 0.0 (least) to 1.0 (most)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,

    /// When the underlying data last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Annotations {
    /// Annotations targeted at an audience
    pub fn for_audience(audience: Vec<Role>) -> Self {
        Self {
            audience: Some(audience),
            ..Default::default()
        }
    }
}

/// The contents of an embedded resource inside a content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedResource {
    /// URI of the resource
    pub uri: String,

    /// Registered name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Textual payload, mutually exclusive with `blob`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Base64 binary payload, mutually exclusive with `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,

    /// Optional annotations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A single item in a tool or prompt reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Plain text
    Text {
        /// The text content
        text: String,
        /// Optional annotations
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },

    /// Base64-encoded image data
    Image {
        /// Base64 payload
        data: String,
        /// Image MIME type, e.g. `image/png`
        #[serde(rename = "mimeType")]
        mime_type: String,
        /// Optional annotations
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },

    /// Base64-encoded audio data
    Audio {
        /// Base64 payload
        data: String,
        /// Audio MIME type, e.g. `audio/wav`
        #[serde(rename = "mimeType")]
        mime_type: String,
        /// Optional transcription of the audio
        #[serde(skip_serializing_if = "Option::is_none")]
        transcription: Option<String>,
        /// Optional annotations
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },

    /// A resource embedded inline
    Resource {
        /// The embedded resource contents
        resource: EmbeddedResource,
    },

    /// A reference to a resource the client can read separately
    ResourceLink {
        /// URI of the linked resource
        uri: String,
        /// Registered name
        name: String,
        /// Display title
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Human-readable description
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// MIME type
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Payload size in bytes, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
        /// Optional annotations
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },
}

impl ContentItem {
    /// Plain text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            annotations: None,
        }
    }

    /// Image content from pre-encoded base64 data
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
        }
    }

    /// Audio content from pre-encoded base64 data
    pub fn audio(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Audio {
            data: data.into(),
            mime_type: mime_type.into(),
            transcription: None,
            annotations: None,
        }
    }

    /// Whether this item is text
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// The text payload, when this item is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_content_wire_shape() {
        let item = ContentItem::text("hello");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn image_content_uses_mime_type_key() {
        let item = ContentItem::image("aGk=", "image/png");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["mimeType"], "image/png");
    }

    #[test]
    fn resource_link_tag_is_snake_case() {
        let item = ContentItem::ResourceLink {
            uri: "file:///a".to_string(),
            name: "a".to_string(),
            title: None,
            description: None,
            mime_type: None,
            size: Some(12),
            annotations: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "resource_link");
        assert_eq!(value["size"], 12);
    }

    #[test]
    fn annotations_round_trip() {
        let item = ContentItem::Text {
            text: "x".to_string(),
            annotations: Some(Annotations {
                audience: Some(vec![Role::User]),
                priority: Some(0.5),
                last_modified: None,
            }),
        };
        let json = serde_json::to_string(&item).unwrap();
        let parsed: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
        assert!(json.contains(r#""audience":["user"]"#));
    }
}

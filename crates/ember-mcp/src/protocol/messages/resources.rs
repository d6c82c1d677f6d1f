//! Resource listing, reading, and subscription messages

use serde::{Deserialize, Serialize};

use crate::protocol::content::Annotations;

/// Descriptor of a concrete resource as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Exact URI the resource is read at
    pub uri: String,

    /// Unique resource name
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// What the resource contains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the contents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Optional annotations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// Descriptor of a URI-template resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    /// RFC 6570 URI template matched against read requests
    pub uri_template: String,

    /// Unique resource name
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// What the resources under this template contain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the contents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Cursor-bearing parameters shared by the resource listing methods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListResourcesParams {
    /// Opaque pagination cursor from a previous reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Result of `resources/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    /// Resource descriptors, ascending by name
    pub resources: Vec<Resource>,

    /// Cursor for the next page, when more resources remain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Result of `resources/templates/list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResourceTemplatesResult {
    /// Template descriptors, ascending by name
    pub resource_templates: Vec<ResourceTemplate>,

    /// Cursor for the next page, when more templates remain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Parameters of `resources/read`, `resources/subscribe`, and
/// `resources/unsubscribe`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceUriParams {
    /// URI to read or (un)subscribe
    pub uri: String,
}

/// One entry in a `resources/read` reply
///
/// Exactly one of `text` or `blob` is present; the enum makes the
/// neither/both shapes unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceContents {
    /// Textual contents
    #[serde(rename_all = "camelCase")]
    Text {
        /// URI the contents were read from
        uri: String,
        /// MIME type of the contents
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// The text payload
        text: String,
        /// Registered name
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Human-readable description
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Payload size in bytes, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },
    /// Binary contents, base64-encoded
    #[serde(rename_all = "camelCase")]
    Blob {
        /// URI the contents were read from
        uri: String,
        /// MIME type of the contents
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// The base64 payload
        blob: String,
        /// Registered name
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Human-readable description
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Payload size in bytes, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },
}

impl ResourceContents {
    /// The URI these contents were read from
    pub fn uri(&self) -> &str {
        match self {
            ResourceContents::Text { uri, .. } | ResourceContents::Blob { uri, .. } => uri,
        }
    }
}

/// Result of `resources/read`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceResult {
    /// The contents read, one entry per matched resource
    pub contents: Vec<ResourceContents>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_contents_wire_shape() {
        let contents = ResourceContents::Text {
            uri: "file:///a.txt".to_string(),
            mime_type: Some("text/plain".to_string()),
            text: "hi".to_string(),
            name: None,
            description: None,
            size: None,
        };
        let value = serde_json::to_value(&contents).unwrap();
        assert_eq!(
            value,
            json!({"uri": "file:///a.txt", "mimeType": "text/plain", "text": "hi"})
        );
    }

    #[test]
    fn blob_contents_parse_back() {
        let value = json!({"uri": "file:///b", "blob": "aGk=", "mimeType": "application/octet-stream"});
        let contents: ResourceContents = serde_json::from_value(value).unwrap();
        assert!(matches!(contents, ResourceContents::Blob { .. }));
        assert_eq!(contents.uri(), "file:///b");
    }

    #[test]
    fn template_descriptor_uses_uri_template_key() {
        let template = ResourceTemplate {
            uri_template: "file:///logs/{date}".to_string(),
            name: "logs".to_string(),
            title: None,
            description: None,
            mime_type: None,
        };
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["uriTemplate"], "file:///logs/{date}");
    }
}

//! Fluent builders for component replies
//!
//! Handlers assemble their replies through these builders instead of
//! constructing wire structs by hand. Builder calls append content; the
//! dispatcher materialises the wire shape when encoding the response.
//!
//! # Examples
//!
//! ```rust
//! use ember_mcp::protocol::ToolResponse;
//! use serde_json::json;
//!
//! let response = ToolResponse::new()
//!     .text("2 + 3 = 5")
//!     .structured(json!({"sum": 5}));
//!
//! let result = response.into_result();
//! assert!(!result.is_error);
//! assert_eq!(result.structured_content, Some(json!({"sum": 5})));
//! ```

use serde_json::Value;

use crate::protocol::content::{Annotations, ContentItem, EmbeddedResource};
use crate::protocol::messages::{
    CallToolResult, CompleteResult, CompletionValue, GetPromptResult, PromptMessage,
    ResourceContents,
};
use crate::protocol::types::Role;

/// Builder for `tools/call` replies
#[derive(Debug, Clone, Default)]
pub struct ToolResponse {
    content: Vec<ContentItem>,
    is_error: bool,
    structured_content: Option<Value>,
}

impl ToolResponse {
    /// Start an empty, successful response
    pub fn new() -> Self {
        Self::default()
    }

    /// A response with a single text item
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    /// A domain-error response carrying an explanatory text item
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            is_error: true,
            structured_content: None,
        }
    }

    /// Append a text item
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content.push(ContentItem::text(text));
        self
    }

    /// Append an image item
    pub fn image(mut self, data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.content.push(ContentItem::image(data, mime_type));
        self
    }

    /// Append an audio item
    pub fn audio(mut self, data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.content.push(ContentItem::audio(data, mime_type));
        self
    }

    /// Append an arbitrary content item
    pub fn item(mut self, item: ContentItem) -> Self {
        self.content.push(item);
        self
    }

    /// Append an embedded resource item
    pub fn embedded_resource(mut self, resource: EmbeddedResource) -> Self {
        self.content.push(ContentItem::Resource { resource });
        self
    }

    /// Set the structured payload
    ///
    /// When no content item was added explicitly, materialisation adds a
    /// text rendering of the payload so plain-text clients see the result
    /// too.
    pub fn structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Mark the response as a domain failure
    pub fn with_error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }

    /// Annotate the most recently appended item
    pub fn annotate(mut self, annotations: Annotations) -> Self {
        if let Some(last) = self.content.last_mut() {
            match last {
                ContentItem::Text { annotations: slot, .. }
                | ContentItem::Image { annotations: slot, .. }
                | ContentItem::Audio { annotations: slot, .. }
                | ContentItem::ResourceLink { annotations: slot, .. } => {
                    *slot = Some(annotations);
                }
                ContentItem::Resource { resource } => {
                    resource.annotations = Some(annotations);
                }
            }
        }
        self
    }

    /// Materialise the wire shape
    pub fn into_result(self) -> CallToolResult {
        let mut content = self.content;
        if content.is_empty() {
            if let Some(structured) = &self.structured_content {
                content.push(ContentItem::text(structured.to_string()));
            }
        }
        CallToolResult {
            content,
            is_error: self.is_error,
            structured_content: self.structured_content,
        }
    }
}

/// Builder for `prompts/get` replies
#[derive(Debug, Clone, Default)]
pub struct PromptResponse {
    description: Option<String>,
    messages: Vec<PromptMessage>,
}

impl PromptResponse {
    /// Start an empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rendering description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a user-role text message
    pub fn user_text(mut self, text: impl Into<String>) -> Self {
        self.messages.push(PromptMessage::user_text(text));
        self
    }

    /// Append an assistant-role text message
    pub fn assistant_text(mut self, text: impl Into<String>) -> Self {
        self.messages.push(PromptMessage::assistant_text(text));
        self
    }

    /// Append a system-role text message
    pub fn system_text(mut self, text: impl Into<String>) -> Self {
        self.messages.push(PromptMessage {
            role: Role::System,
            content: ContentItem::text(text),
        });
        self
    }

    /// Append an arbitrary message
    pub fn message(mut self, message: PromptMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Materialise the wire shape
    pub fn into_result(self) -> GetPromptResult {
        GetPromptResult {
            description: self.description,
            messages: self.messages,
        }
    }
}

/// Handler-side resource payload, enriched by the dispatcher
///
/// Carries exactly one of a text or blob body. The dispatcher fills in the
/// matched URI and falls back to the registered MIME type, so handlers only
/// state what they read.
#[derive(Debug, Clone)]
pub struct ResourceResponse {
    body: ResourceBody,
    name: Option<String>,
    description: Option<String>,
    size: Option<u64>,
    mime_type: Option<String>,
}

#[derive(Debug, Clone)]
enum ResourceBody {
    Text(String),
    Blob(String),
}

impl ResourceResponse {
    /// A textual payload
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            body: ResourceBody::Text(text.into()),
            name: None,
            description: None,
            size: None,
            mime_type: None,
        }
    }

    /// A binary payload, already base64-encoded
    pub fn blob(blob: impl Into<String>) -> Self {
        Self {
            body: ResourceBody::Blob(blob.into()),
            name: None,
            description: None,
            size: None,
            mime_type: None,
        }
    }

    /// A binary payload from raw bytes
    pub fn blob_bytes(bytes: &[u8]) -> Self {
        use base64::Engine as _;
        Self::blob(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the payload size in bytes
    pub fn sized(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Override the MIME type registered for the resource
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Materialise wire contents for the given URI and registered MIME type
    pub fn into_contents(self, uri: &str, registered_mime: Option<&str>) -> ResourceContents {
        let mime_type = self
            .mime_type
            .or_else(|| registered_mime.map(str::to_string));
        match self.body {
            ResourceBody::Text(text) => ResourceContents::Text {
                uri: uri.to_string(),
                mime_type,
                text,
                name: self.name,
                description: self.description,
                size: self.size,
            },
            ResourceBody::Blob(blob) => ResourceContents::Blob {
                uri: uri.to_string(),
                mime_type,
                blob,
                name: self.name,
                description: self.description,
                size: self.size,
            },
        }
    }
}

/// Builder for `completion/complete` replies
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    values: Vec<CompletionValue>,
    total: Option<u64>,
    has_more: Option<bool>,
}

impl CompletionResponse {
    /// Start an empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(CompletionValue {
            value: value.into(),
            description: None,
            label: None,
        });
        self
    }

    /// Append a candidate with a description
    pub fn value_with_description(
        mut self,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.values.push(CompletionValue {
            value: value.into(),
            description: Some(description.into()),
            label: None,
        });
        self
    }

    /// Set the total candidate count
    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Flag that more candidates exist
    pub fn has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }

    /// Materialise the wire shape
    pub fn into_result(self) -> CompleteResult {
        CompleteResult {
            values: self.values,
            total: self.total,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_without_content_renders_text_fallback() {
        let result = ToolResponse::new().structured(json!({"sum": 5})).into_result();
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.content[0].as_text(), Some(r#"{"sum":5}"#));
        assert_eq!(result.structured_content, Some(json!({"sum": 5})));
    }

    #[test]
    fn error_response_sets_flag() {
        let result = ToolResponse::error("division by zero").into_result();
        assert!(result.is_error);
        assert_eq!(result.content[0].as_text(), Some("division by zero"));
    }

    #[test]
    fn prompt_builder_orders_messages() {
        let result = PromptResponse::new()
            .describe("greeting")
            .system_text("be kind")
            .user_text("hello")
            .into_result();
        assert_eq!(result.description.as_deref(), Some("greeting"));
        assert_eq!(result.messages.len(), 2);
    }

    #[test]
    fn resource_response_inherits_registered_mime() {
        let contents = ResourceResponse::text("hi").into_contents("file:///a", Some("text/plain"));
        let ResourceContents::Text { mime_type, uri, .. } = contents else {
            panic!("expected text contents");
        };
        assert_eq!(mime_type.as_deref(), Some("text/plain"));
        assert_eq!(uri, "file:///a");
    }

    #[test]
    fn resource_response_override_wins() {
        let contents = ResourceResponse::blob("aGk=")
            .mime_type("application/x-custom")
            .into_contents("file:///b", Some("application/octet-stream"));
        let ResourceContents::Blob { mime_type, .. } = contents else {
            panic!("expected blob contents");
        };
        assert_eq!(mime_type.as_deref(), Some("application/x-custom"));
    }

    #[test]
    fn completion_builder_collects_values() {
        let result = CompletionResponse::new()
            .value("alpha")
            .value_with_description("beta", "second")
            .total(10)
            .has_more(true)
            .into_result();
        assert_eq!(result.values.len(), 2);
        assert_eq!(result.total, Some(10));
    }
}

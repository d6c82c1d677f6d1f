//! Tool components: registration records and the handler trait

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::protocol::builders::ToolResponse;
use crate::protocol::messages::Tool;
use crate::registry::RegistryError;
use crate::schema;

/// Executable body of a tool
///
/// Handlers run inside the per-session dispatch; blocking work should be
/// offloaded by the implementation. A domain failure is expressed by
/// returning [`ToolResponse::error`], a protocol-level failure by returning
/// a [`CoreError`].
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use ember_mcp::{CoreResult, Frame, ToolResponse};
/// use serde_json::Value;
///
/// struct Add;
///
/// #[async_trait]
/// impl ember_mcp::ToolHandler for Add {
///     async fn call(&self, arguments: Value, _frame: &Frame) -> CoreResult<ToolResponse> {
///         let a = arguments["a"].as_i64().unwrap_or(0);
///         let b = arguments["b"].as_i64().unwrap_or(0);
///         Ok(ToolResponse::new().structured(serde_json::json!({"sum": a + b})))
///     }
/// }
/// ```
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with schema-validated arguments
    async fn call(&self, arguments: Value, frame: &Frame) -> CoreResult<ToolResponse>;
}

/// A registered tool: wire descriptor plus handler
#[derive(Clone)]
pub struct ToolComponent {
    descriptor: Tool,
    handler: Arc<dyn ToolHandler>,
}

impl ToolComponent {
    /// Register a tool under a name with its argument schema
    ///
    /// # Errors
    ///
    /// Rejects schemas that do not describe a JSON object; a tool without a
    /// usable input schema cannot be validated and must fail at startup,
    /// not at call time.
    pub fn new(
        name: impl Into<String>,
        input_schema: Value,
        handler: impl ToolHandler + 'static,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if !schema::is_object_schema(&input_schema) {
            return Err(RegistryError::InvalidInputSchema { name });
        }
        Ok(Self {
            descriptor: Tool {
                name,
                title: None,
                description: None,
                input_schema,
                output_schema: None,
                annotations: None,
            },
            handler: Arc::new(handler),
        })
    }

    /// Set the display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.descriptor.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = Some(description.into());
        self
    }

    /// Declare the schema of `structuredContent` in this tool's replies
    pub fn output_schema(mut self, output_schema: Value) -> Self {
        self.descriptor.output_schema = Some(output_schema);
        self
    }

    /// Attach behavioral hint annotations
    pub fn annotations(mut self, annotations: Value) -> Self {
        self.descriptor.annotations = Some(annotations);
        self
    }

    /// The unique tool name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The wire descriptor listed to clients
    pub fn descriptor(&self) -> &Tool {
        &self.descriptor
    }

    /// Validate a call's arguments against the input schema
    pub(crate) fn validate_input(&self, arguments: &Value) -> CoreResult<()> {
        schema::validate(&self.descriptor.input_schema, arguments, "arguments").map_err(
            |violations| {
                CoreError::invalid_params_with(
                    format!("arguments for tool '{}' failed validation", self.name()),
                    violations.iter().map(ToString::to_string).collect(),
                )
            },
        )
    }

    /// Validate a reply's structured payload against the output schema
    pub(crate) fn validate_output(&self, structured: &Value) -> CoreResult<()> {
        let Some(output_schema) = &self.descriptor.output_schema else {
            return Ok(());
        };
        schema::validate(output_schema, structured, "structuredContent").map_err(|violations| {
            CoreError::internal(format!(
                "tool '{}' returned structured content violating its output schema: {}",
                self.name(),
                violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            ))
        })
    }

    /// Invoke the handler
    pub(crate) async fn call(&self, arguments: Value, frame: &Frame) -> CoreResult<ToolResponse> {
        self.handler.call(arguments, frame).await
    }
}

impl std::fmt::Debug for ToolComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolComponent")
            .field("name", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Noop;

    #[async_trait]
    impl ToolHandler for Noop {
        async fn call(&self, _arguments: Value, _frame: &Frame) -> CoreResult<ToolResponse> {
            Ok(ToolResponse::new())
        }
    }

    #[test]
    fn rejects_non_object_input_schema() {
        let error = ToolComponent::new("bad", json!({"type": "string"}), Noop).unwrap_err();
        assert!(matches!(error, RegistryError::InvalidInputSchema { .. }));
    }

    #[test]
    fn input_validation_maps_to_invalid_params() {
        let tool = ToolComponent::new(
            "add",
            json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
                "required": ["a", "b"]
            }),
            Noop,
        )
        .unwrap();

        assert!(tool.validate_input(&json!({"a": 2, "b": 3})).is_ok());
        let error = tool.validate_input(&json!({"a": "x", "b": 3})).unwrap_err();
        let wire = error.to_wire();
        assert_eq!(wire.code, -32602);
        assert!(wire.data.unwrap()["errors"][0]
            .as_str()
            .unwrap()
            .contains("arguments.a"));
    }

    #[test]
    fn output_validation_is_internal_error() {
        let tool = ToolComponent::new("t", json!({"type": "object"}), Noop)
            .unwrap()
            .output_schema(json!({
                "type": "object",
                "properties": {"sum": {"type": "integer"}},
                "required": ["sum"]
            }));

        assert!(tool.validate_output(&json!({"sum": 5})).is_ok());
        let error = tool.validate_output(&json!({"sum": "five"})).unwrap_err();
        assert_eq!(error.to_wire().code, -32603);
    }
}

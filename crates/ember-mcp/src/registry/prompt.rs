//! Prompt components: registration records and the handler trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::protocol::builders::PromptResponse;
use crate::protocol::messages::{Prompt, PromptArgument};
use crate::registry::RegistryError;
use crate::schema;

/// Rendering body of a prompt
#[async_trait]
pub trait PromptHandler: Send + Sync {
    /// Render the prompt messages for the given argument values
    async fn render(
        &self,
        arguments: HashMap<String, String>,
        frame: &Frame,
    ) -> CoreResult<PromptResponse>;
}

/// A registered prompt: name, derived argument list, and handler
#[derive(Clone)]
pub struct PromptComponent {
    prompt: Prompt,
    handler: Arc<dyn PromptHandler>,
}

impl PromptComponent {
    /// Register a prompt taking no arguments
    pub fn new(name: impl Into<String>, handler: impl PromptHandler + 'static) -> Self {
        Self {
            prompt: Prompt {
                name: name.into(),
                title: None,
                description: None,
                arguments: Vec::new(),
            },
            handler: Arc::new(handler),
        }
    }

    /// Derive the client-visible argument list from a JSON-Schema object
    ///
    /// Each schema property becomes an argument entry; `required` marks the
    /// mandatory ones.
    ///
    /// # Errors
    ///
    /// Rejects schemas that do not describe a JSON object.
    pub fn arguments_schema(mut self, schema: Value) -> Result<Self, RegistryError> {
        if !schema::is_object_schema(&schema) {
            return Err(RegistryError::InvalidInputSchema {
                name: self.prompt.name.clone(),
            });
        }

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut arguments: Vec<PromptArgument> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, property)| PromptArgument {
                        name: name.clone(),
                        description: property
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        required: Some(required.contains(&name.as_str())),
                    })
                    .collect()
            })
            .unwrap_or_default();
        arguments.sort_by(|a, b| a.name.cmp(&b.name));

        self.prompt.arguments = arguments;
        Ok(self)
    }

    /// Set the display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.prompt.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.prompt.description = Some(description.into());
        self
    }

    /// The unique prompt name
    pub fn name(&self) -> &str {
        &self.prompt.name
    }

    /// The wire descriptor listed to clients
    pub fn descriptor(&self) -> &Prompt {
        &self.prompt
    }

    /// Check that every required argument was supplied
    pub(crate) fn validate_arguments(
        &self,
        arguments: &HashMap<String, String>,
    ) -> CoreResult<()> {
        let missing: Vec<String> = self
            .prompt
            .arguments
            .iter()
            .filter(|argument| argument.required == Some(true))
            .filter(|argument| !arguments.contains_key(&argument.name))
            .map(|argument| format!("missing required argument: {}", argument.name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::invalid_params_with(
                format!("arguments for prompt '{}' failed validation", self.name()),
                missing,
            ))
        }
    }

    /// Invoke the handler
    pub(crate) async fn render(
        &self,
        arguments: HashMap<String, String>,
        frame: &Frame,
    ) -> CoreResult<PromptResponse> {
        self.handler.render(arguments, frame).await
    }
}

impl std::fmt::Debug for PromptComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptComponent")
            .field("name", &self.prompt.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Greeter;

    #[async_trait]
    impl PromptHandler for Greeter {
        async fn render(
            &self,
            arguments: HashMap<String, String>,
            _frame: &Frame,
        ) -> CoreResult<PromptResponse> {
            let who = arguments.get("who").cloned().unwrap_or_default();
            Ok(PromptResponse::new().user_text(format!("Hello, {who}!")))
        }
    }

    fn greeter() -> PromptComponent {
        PromptComponent::new("greet", Greeter)
            .arguments_schema(json!({
                "type": "object",
                "properties": {
                    "who": {"type": "string", "description": "Name to greet"},
                    "tone": {"type": "string"}
                },
                "required": ["who"]
            }))
            .unwrap()
    }

    #[test]
    fn arguments_derived_from_schema() {
        let prompt = greeter();
        let descriptor = prompt.descriptor();
        assert_eq!(descriptor.arguments.len(), 2);

        let who = descriptor.arguments.iter().find(|a| a.name == "who").unwrap();
        assert_eq!(who.required, Some(true));
        assert_eq!(who.description.as_deref(), Some("Name to greet"));

        let tone = descriptor.arguments.iter().find(|a| a.name == "tone").unwrap();
        assert_eq!(tone.required, Some(false));
    }

    #[test]
    fn missing_required_argument_is_invalid_params() {
        let prompt = greeter();
        assert!(prompt.validate_arguments(&HashMap::new()).is_err());

        let mut arguments = HashMap::new();
        arguments.insert("who".to_string(), "world".to_string());
        assert!(prompt.validate_arguments(&arguments).is_ok());
    }

    #[test]
    fn non_object_schema_is_rejected() {
        let error = PromptComponent::new("p", Greeter)
            .arguments_schema(json!({"type": "array"}))
            .unwrap_err();
        assert!(matches!(error, RegistryError::InvalidInputSchema { .. }));
    }
}

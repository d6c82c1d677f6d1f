//! Component registry and dispatcher
//!
//! Holds the tools, resources, and prompts a server exposes and answers the
//! `tools/*`, `resources/*`, and `prompts/*` methods against them. Static
//! registrations happen through the builder before the core starts;
//! session-scoped dynamic registrations (made through the frame) are merged
//! in at list and lookup time without affecting other sessions.

pub mod pagination;
mod prompt;
mod resource;
mod tool;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

pub use prompt::{PromptComponent, PromptHandler};
pub use resource::{ResourceComponent, ResourceHandler, ResourceLocator};
pub use tool::{ToolComponent, ToolHandler};

use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::protocol::messages::{
    CallToolParams, CallToolResult, GetPromptParams, GetPromptResult, ListPromptsParams,
    ListPromptsResult, ListResourcesParams, ListResourcesResult, ListResourceTemplatesResult,
    ListToolsParams, ListToolsResult, ReadResourceResult, ResourceUriParams,
};

/// Failure while assembling the registry at startup
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Two components of one kind share a name
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Component kind ("tool", "prompt", "resource")
        kind: &'static str,
        /// The colliding name
        name: String,
    },

    /// A tool or prompt schema does not describe a JSON object
    #[error("component '{name}' requires a JSON-Schema object as input schema")]
    InvalidInputSchema {
        /// The offending component
        name: String,
    },

    /// A resource template with no literal prefix would match every URI
    #[error("resource template '{name}' has no literal prefix")]
    UnanchoredTemplate {
        /// The offending component
        name: String,
    },
}

/// Registry of the components a server exposes
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    tools: BTreeMap<String, ToolComponent>,
    prompts: BTreeMap<String, PromptComponent>,
    resources: BTreeMap<String, ResourceComponent>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// # Errors
    ///
    /// Rejects a second tool with the same name.
    pub fn register_tool(&mut self, component: ToolComponent) -> Result<(), RegistryError> {
        let name = component.name().to_string();
        if self.tools.insert(name.clone(), component).is_some() {
            return Err(RegistryError::DuplicateName { kind: "tool", name });
        }
        Ok(())
    }

    /// Register a prompt
    ///
    /// # Errors
    ///
    /// Rejects a second prompt with the same name.
    pub fn register_prompt(&mut self, component: PromptComponent) -> Result<(), RegistryError> {
        let name = component.name().to_string();
        if self.prompts.insert(name.clone(), component).is_some() {
            return Err(RegistryError::DuplicateName {
                kind: "prompt",
                name,
            });
        }
        Ok(())
    }

    /// Register a resource
    ///
    /// # Errors
    ///
    /// Rejects a second resource with the same name.
    pub fn register_resource(&mut self, component: ResourceComponent) -> Result<(), RegistryError> {
        let name = component.name().to_string();
        if self.resources.insert(name.clone(), component).is_some() {
            return Err(RegistryError::DuplicateName {
                kind: "resource",
                name,
            });
        }
        Ok(())
    }

    /// Whether any tool is statically registered
    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Whether any prompt is statically registered
    pub fn has_prompts(&self) -> bool {
        !self.prompts.is_empty()
    }

    /// Whether any resource is statically registered
    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    /// Static and session-dynamic tools merged, sorted by name
    ///
    /// A dynamic component whose name collides with a static one is ignored;
    /// name uniqueness within a kind holds for the merged view too.
    fn merged_tools(&self, frame: &Frame) -> Vec<ToolComponent> {
        let mut merged = self.tools.clone();
        for component in frame.session().dynamic_tools() {
            merged.entry(component.name().to_string()).or_insert(component);
        }
        merged.into_values().collect()
    }

    fn merged_prompts(&self, frame: &Frame) -> Vec<PromptComponent> {
        let mut merged = self.prompts.clone();
        for component in frame.session().dynamic_prompts() {
            merged.entry(component.name().to_string()).or_insert(component);
        }
        merged.into_values().collect()
    }

    fn merged_resources(&self, frame: &Frame) -> Vec<ResourceComponent> {
        let mut merged = self.resources.clone();
        for component in frame.session().dynamic_resources() {
            merged.entry(component.name().to_string()).or_insert(component);
        }
        merged.into_values().collect()
    }

    /// Find the resource responsible for a URI: exact matches win over
    /// templates, ties break by name order
    fn find_resource(&self, uri: &str, frame: &Frame) -> Option<ResourceComponent> {
        let merged = self.merged_resources(frame);
        merged
            .iter()
            .find(|component| !component.is_template() && component.matches(uri))
            .or_else(|| {
                merged
                    .iter()
                    .find(|component| component.is_template() && component.matches(uri))
            })
            .cloned()
    }

    /// Whether any registered resource (static or dynamic) covers a URI
    pub(crate) fn covers_uri(&self, uri: &str, frame: &Frame) -> bool {
        self.find_resource(uri, frame).is_some()
    }

    /// Handle `tools/list`
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) async fn list_tools(
        &self,
        params: Option<&Value>,
        frame: &Frame,
        limit: Option<usize>,
    ) -> CoreResult<Value> {
        let params: ListToolsParams = parse_optional(params)?;
        let tools = self.merged_tools(frame);
        let (page, next_cursor) = pagination::paginate(
            tools,
            ToolComponent::name,
            params.cursor.as_deref(),
            limit,
        )?;
        to_result(&ListToolsResult {
            tools: page
                .iter()
                .map(|component| component.descriptor().clone())
                .collect(),
            next_cursor,
        })
    }

    /// Handle `tools/call`
    #[instrument(level = "debug", skip(self, params, frame))]
    pub(crate) async fn call_tool(
        &self,
        params: Option<&Value>,
        frame: &Frame,
    ) -> CoreResult<Value> {
        let params: CallToolParams = parse_required(params)?;
        let tool = self
            .merged_tools(frame)
            .into_iter()
            .find(|component| component.name() == params.name)
            .ok_or_else(|| CoreError::invalid_params(format!("unknown tool: {}", params.name)))?;

        let arguments = if params.arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            params.arguments
        };
        tool.validate_input(&arguments)?;

        let response = tool.call(arguments, frame).await?;
        let result: CallToolResult = response.into_result();
        if let Some(structured) = &result.structured_content {
            tool.validate_output(structured)?;
        }
        to_result(&result)
    }

    /// Handle `resources/list`
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) async fn list_resources(
        &self,
        params: Option<&Value>,
        frame: &Frame,
        limit: Option<usize>,
    ) -> CoreResult<Value> {
        let params: ListResourcesParams = parse_optional(params)?;
        let concrete: Vec<ResourceComponent> = self
            .merged_resources(frame)
            .into_iter()
            .filter(|component| !component.is_template())
            .collect();
        let (page, next_cursor) = pagination::paginate(
            concrete,
            ResourceComponent::name,
            params.cursor.as_deref(),
            limit,
        )?;
        to_result(&ListResourcesResult {
            resources: page
                .iter()
                .filter_map(ResourceComponent::descriptor)
                .collect(),
            next_cursor,
        })
    }

    /// Handle `resources/templates/list`
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) async fn list_resource_templates(
        &self,
        params: Option<&Value>,
        frame: &Frame,
        limit: Option<usize>,
    ) -> CoreResult<Value> {
        let params: ListResourcesParams = parse_optional(params)?;
        let templates: Vec<ResourceComponent> = self
            .merged_resources(frame)
            .into_iter()
            .filter(ResourceComponent::is_template)
            .collect();
        let (page, next_cursor) = pagination::paginate(
            templates,
            ResourceComponent::name,
            params.cursor.as_deref(),
            limit,
        )?;
        to_result(&ListResourceTemplatesResult {
            resource_templates: page
                .iter()
                .filter_map(ResourceComponent::template_descriptor)
                .collect(),
            next_cursor,
        })
    }

    /// Handle `resources/read`
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) async fn read_resource(
        &self,
        params: Option<&Value>,
        frame: &Frame,
    ) -> CoreResult<Value> {
        let params: ResourceUriParams = parse_required(params)?;
        let resource = self
            .find_resource(&params.uri, frame)
            .ok_or_else(|| CoreError::resource_not_found(&params.uri))?;

        let response = resource.read(&params.uri, frame).await?;
        let contents = response.into_contents(&params.uri, resource.registered_mime_type());
        to_result(&ReadResourceResult {
            contents: vec![contents],
        })
    }

    /// Handle `prompts/list`
    #[instrument(level = "debug", skip(self, frame))]
    pub(crate) async fn list_prompts(
        &self,
        params: Option<&Value>,
        frame: &Frame,
        limit: Option<usize>,
    ) -> CoreResult<Value> {
        let params: ListPromptsParams = parse_optional(params)?;
        let prompts = self.merged_prompts(frame);
        let (page, next_cursor) = pagination::paginate(
            prompts,
            PromptComponent::name,
            params.cursor.as_deref(),
            limit,
        )?;
        to_result(&ListPromptsResult {
            prompts: page
                .iter()
                .map(|component| component.descriptor().clone())
                .collect(),
            next_cursor,
        })
    }

    /// Handle `prompts/get`
    #[instrument(level = "debug", skip(self, params, frame))]
    pub(crate) async fn get_prompt(
        &self,
        params: Option<&Value>,
        frame: &Frame,
    ) -> CoreResult<Value> {
        let params: GetPromptParams = parse_required(params)?;
        let prompt = self
            .merged_prompts(frame)
            .into_iter()
            .find(|component| component.name() == params.name)
            .ok_or_else(|| CoreError::invalid_params(format!("unknown prompt: {}", params.name)))?;

        prompt.validate_arguments(&params.arguments)?;
        let response = prompt.render(params.arguments, frame).await?;
        let result: GetPromptResult = response.into_result();
        to_result(&result)
    }
}

/// Parse params for methods where they are optional, defaulting when absent
fn parse_optional<T: DeserializeOwned + Default>(params: Option<&Value>) -> CoreResult<T> {
    match params {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|error| CoreError::invalid_params(error.to_string())),
    }
}

/// Parse params for methods that require them
fn parse_required<T: DeserializeOwned>(params: Option<&Value>) -> CoreResult<T> {
    let value = params.ok_or_else(|| CoreError::invalid_params("params are required"))?;
    serde_json::from_value(value.clone())
        .map_err(|error| CoreError::invalid_params(error.to_string()))
}

fn to_result<T: serde::Serialize>(result: &T) -> CoreResult<Value> {
    serde_json::to_value(result).map_err(|error| CoreError::internal(error.to_string()))
}

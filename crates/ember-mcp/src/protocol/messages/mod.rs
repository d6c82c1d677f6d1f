//! Typed parameter and result shapes for every MCP method family

pub mod completion;
pub mod initialization;
pub mod logging;
pub mod notifications;
pub mod prompts;
pub mod resources;
pub mod sampling;
pub mod tools;

pub use completion::{
    CompleteParams, CompleteResult, CompletionArgument, CompletionReference, CompletionValue,
};
pub use initialization::{InitializeParams, InitializeResult};
pub use logging::{LogMessageParams, SetLevelParams};
pub use notifications::{CancelledParams, ProgressParams, ResourceUpdatedParams};
pub use prompts::{
    GetPromptParams, GetPromptResult, ListPromptsParams, ListPromptsResult, Prompt,
    PromptArgument, PromptMessage,
};
pub use resources::{
    ListResourcesParams, ListResourcesResult, ListResourceTemplatesResult, ReadResourceResult,
    Resource, ResourceContents, ResourceTemplate, ResourceUriParams,
};
pub use sampling::{
    CreateMessageParams, CreateMessageResult, ListRootsResult, ModelHint, ModelPreferences, Root,
    SamplingMessage,
};
pub use tools::{CallToolParams, CallToolResult, ListToolsParams, ListToolsResult, Tool};

//! Resource components: registration records and the handler trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::frame::Frame;
use crate::protocol::builders::ResourceResponse;
use crate::protocol::messages::{Resource, ResourceTemplate};
use crate::registry::RegistryError;

/// Readable body of a resource
///
/// `uri` is the concrete URI being read, which for template resources is
/// the client's expansion rather than the registered template.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Read the resource contents for a URI
    async fn read(&self, uri: &str, frame: &Frame) -> CoreResult<ResourceResponse>;
}

/// How a resource is addressed: one exact URI or a URI template
///
/// Exactly one form exists per component by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    /// Matches a single URI verbatim
    Exact(String),
    /// Matches expansions of an RFC 6570 template; matching is by the
    /// literal prefix before the first expression
    Template(String),
}

impl ResourceLocator {
    /// Whether a requested URI falls under this locator
    pub fn matches(&self, uri: &str) -> bool {
        match self {
            ResourceLocator::Exact(exact) => exact == uri,
            ResourceLocator::Template(template) => {
                let prefix = template.split('{').next().unwrap_or(template);
                !prefix.is_empty() && uri.starts_with(prefix)
            }
        }
    }
}

/// A registered resource: locator, metadata, and handler
#[derive(Clone)]
pub struct ResourceComponent {
    locator: ResourceLocator,
    name: String,
    title: Option<String>,
    description: Option<String>,
    mime_type: Option<String>,
    handler: Arc<dyn ResourceHandler>,
}

impl ResourceComponent {
    /// Register a resource at an exact URI
    pub fn fixed(
        uri: impl Into<String>,
        name: impl Into<String>,
        handler: impl ResourceHandler + 'static,
    ) -> Self {
        Self {
            locator: ResourceLocator::Exact(uri.into()),
            name: name.into(),
            title: None,
            description: None,
            mime_type: None,
            handler: Arc::new(handler),
        }
    }

    /// Register a resource under a URI template
    ///
    /// # Errors
    ///
    /// Rejects templates whose literal prefix is empty; such a template
    /// would match every URI.
    pub fn template(
        uri_template: impl Into<String>,
        name: impl Into<String>,
        handler: impl ResourceHandler + 'static,
    ) -> Result<Self, RegistryError> {
        let uri_template = uri_template.into();
        let name = name.into();
        if uri_template.split('{').next().unwrap_or("").is_empty() {
            return Err(RegistryError::UnanchoredTemplate { name });
        }
        Ok(Self {
            locator: ResourceLocator::Template(uri_template),
            name,
            title: None,
            description: None,
            mime_type: None,
            handler: Arc::new(handler),
        })
    }

    /// Set the display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type reported for the contents
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// The unique resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How this resource is addressed
    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// The registered MIME type
    pub fn registered_mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Whether this component is addressed by a template
    pub fn is_template(&self) -> bool {
        matches!(self.locator, ResourceLocator::Template(_))
    }

    /// Whether a requested URI falls under this component
    pub fn matches(&self, uri: &str) -> bool {
        self.locator.matches(uri)
    }

    /// Wire descriptor for `resources/list`; `None` for templates
    pub fn descriptor(&self) -> Option<Resource> {
        match &self.locator {
            ResourceLocator::Exact(uri) => Some(Resource {
                uri: uri.clone(),
                name: self.name.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                mime_type: self.mime_type.clone(),
                annotations: None,
            }),
            ResourceLocator::Template(_) => None,
        }
    }

    /// Wire descriptor for `resources/templates/list`; `None` for exact URIs
    pub fn template_descriptor(&self) -> Option<ResourceTemplate> {
        match &self.locator {
            ResourceLocator::Template(uri_template) => Some(ResourceTemplate {
                uri_template: uri_template.clone(),
                name: self.name.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                mime_type: self.mime_type.clone(),
            }),
            ResourceLocator::Exact(_) => None,
        }
    }

    /// Invoke the handler for a concrete URI
    pub(crate) async fn read(&self, uri: &str, frame: &Frame) -> CoreResult<ResourceResponse> {
        self.handler.read(uri, frame).await
    }
}

impl std::fmt::Debug for ResourceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceComponent")
            .field("name", &self.name)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    #[async_trait]
    impl ResourceHandler for Empty {
        async fn read(&self, _uri: &str, _frame: &Frame) -> CoreResult<ResourceResponse> {
            Ok(ResourceResponse::text(""))
        }
    }

    #[test]
    fn exact_locator_matches_verbatim() {
        let resource = ResourceComponent::fixed("file:///a.txt", "a", Empty);
        assert!(resource.matches("file:///a.txt"));
        assert!(!resource.matches("file:///a.txt2"));
        assert!(resource.descriptor().is_some());
        assert!(resource.template_descriptor().is_none());
    }

    #[test]
    fn template_matches_by_prefix() {
        let resource =
            ResourceComponent::template("file:///logs/{date}", "logs", Empty).unwrap();
        assert!(resource.matches("file:///logs/2025-01-01"));
        assert!(!resource.matches("file:///other/2025-01-01"));
        assert!(resource.is_template());
        assert_eq!(
            resource.template_descriptor().unwrap().uri_template,
            "file:///logs/{date}"
        );
    }

    #[test]
    fn unanchored_template_is_rejected() {
        let error = ResourceComponent::template("{anything}", "all", Empty).unwrap_err();
        assert!(matches!(error, RegistryError::UnanchoredTemplate { .. }));
    }
}

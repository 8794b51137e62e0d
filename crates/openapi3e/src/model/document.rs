//! The root OpenAPI document

use super::components::Components;
use super::info::Info;
use super::path::Paths;
use super::security::SecurityRequirement;
use super::server::Server;
use super::tag::{ExternalDocumentation, Tag};
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result};
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// The OpenAPI version every document declares
pub const OPENAPI_VERSION: &str = "3.0.2";

#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    info: Info,
    servers: Vec<Server>,
    paths: Paths,
    components: Option<Components>,
    security: Vec<SecurityRequirement>,
    tags: Vec<Tag>,
    external_docs: Option<ExternalDocumentation>,
}

impl OpenApiDocument {
    pub const fn new(info: Info, paths: Paths) -> Self {
        Self {
            info,
            servers: Vec::new(),
            paths,
            components: None,
            security: Vec::new(),
            tags: Vec::new(),
            external_docs: None,
        }
    }

    /// Attach components; an empty container is dropped
    #[must_use]
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = (!components.is_empty()).then_some(components);
        self
    }

    #[must_use]
    pub fn with_servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    #[must_use]
    pub fn with_security(mut self, security: Vec<SecurityRequirement>) -> Self {
        self.security = security;
        self
    }

    /// # Errors
    /// Returns `DuplicateTag` when two tags share a name
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Result<Self> {
        check_unique_tags(&tags)?;
        self.tags = tags;
        Ok(self)
    }

    #[must_use]
    pub fn with_external_docs(mut self, docs: Option<ExternalDocumentation>) -> Self {
        self.external_docs = docs;
        self
    }

    pub const fn info(&self) -> &Info {
        &self.info
    }

    pub const fn paths(&self) -> &Paths {
        &self.paths
    }

    pub const fn components(&self) -> Option<&Components> {
        self.components.as_ref()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Check document-wide uniqueness of tag names and operationIds
    ///
    /// # Errors
    /// Returns `DuplicateTag` or `DuplicateOperationId`
    pub fn validate(&self) -> Result<()> {
        check_unique_tags(&self.tags)?;

        let mut seen: HashMap<&str, String> = HashMap::new();
        for (uri, item) in self.paths.iter() {
            for (method, operation) in item.operations() {
                let location = format!("{method} {uri}");
                if let Some(first) = seen.insert(operation.operation_id(), location.clone()) {
                    return Err(OpenApiError::DuplicateOperationId {
                        operation_id: operation.operation_id().to_string(),
                        first,
                        second: location,
                    });
                }
            }
        }
        Ok(())
    }

    /// Compact JSON
    ///
    /// # Errors
    /// Returns `Json` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }

    /// # Errors
    /// Returns `Yaml` if encoding fails
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_wire())?)
    }
}

fn check_unique_tags(tags: &[Tag]) -> Result<()> {
    let mut names = HashSet::new();
    match tags.iter().find(|tag| !names.insert(tag.name())) {
        Some(duplicate) => Err(OpenApiError::DuplicateTag {
            name: duplicate.name().to_string(),
        }),
        None => Ok(()),
    }
}

impl WireObject for OpenApiDocument {
    fn kind(&self) -> WireKind {
        WireKind::Document
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("openapi", Field::Str(OPENAPI_VERSION)),
            ("info", Field::Object(&self.info)),
            ("servers", Field::objects(&self.servers)),
            ("paths", Field::Object(&self.paths)),
            ("components", Field::opt_object(&self.components)),
            ("security", Field::objects(&self.security)),
            ("tags", Field::objects(&self.tags)),
            ("external_docs", Field::opt_object(&self.external_docs)),
        ])
    }
}

impl Serialize for OpenApiDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

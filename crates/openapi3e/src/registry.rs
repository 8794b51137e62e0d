//! Documentation staged per handler before routes are known
//!
//! A [`DocRegistry`] is filled while the API is defined: each handler gets
//! a [`RouteDoc`] accumulator through the fluent [`RouteDocBuilder`]. The
//! assembler consumes the registry once, joining each route's handlers to
//! their accumulators.

use crate::error::{OpenApiError, Result};
use crate::model::{
    ExternalDocumentation, Field, Fields, Parameter, ParameterBuilder, RefOr, Reference,
    RequestBody, Response, Responses, Schema, SecurityRequirement, Server, Tag, WireKind,
    WireObject,
};
use crate::router::HandlerId;
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Tags by name, shared by every handler of one registry
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: IndexMap<String, Tag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or create the tag `name`.
    ///
    /// A description fills an undescribed tag; repeating the known
    /// description or passing none is a no-op.
    ///
    /// # Errors
    /// - `MissingField` for a blank name
    /// - `TagConflict` when the tag already has a different description
    pub fn resolve(&mut self, name: &str, description: Option<&str>) -> Result<Tag> {
        let tag = match self.tags.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Tag::new(name)?),
        };

        let current = tag.description().map(str::to_string);
        match (current.as_deref(), description) {
            (Some(existing), Some(incoming)) if existing != incoming => {
                return Err(OpenApiError::TagConflict {
                    name: name.to_string(),
                    existing: existing.to_string(),
                    conflicting: incoming.to_string(),
                });
            }
            (None, Some(incoming)) => tag.set_description(incoming.to_string()),
            _ => {}
        }

        Ok(tag.clone())
    }

    /// Register a fully described tag, such as one from configuration
    ///
    /// # Errors
    /// Returns `TagConflict` like [`TagRegistry::resolve`]
    pub fn register(&mut self, tag: &Tag) -> Result<Tag> {
        self.resolve(tag.name(), tag.description())?;
        let stored = self
            .tags
            .get_mut(tag.name())
            .ok_or_else(|| OpenApiError::MissingField {
                object: "Tag",
                field: "name",
            })?;
        if stored.external_docs().is_none()
            && let Some(docs) = tag.external_docs()
        {
            stored.set_external_docs(docs.clone());
        }
        Ok(stored.clone())
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Everything staged for one handler
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDoc {
    summary: Option<String>,
    description: Option<String>,
    parameters: Vec<RefOr<Parameter>>,
    request_body: Option<RefOr<RequestBody>>,
    external_docs: Option<ExternalDocumentation>,
    security: Option<Vec<SecurityRequirement>>,
    servers: Vec<Server>,
    x_tags: Vec<Tag>,
    x_deprecated: bool,
    x_responses: Responses,
    x_exclude: bool,
}

impl Default for RouteDoc {
    fn default() -> Self {
        Self {
            summary: None,
            description: None,
            parameters: Vec::new(),
            request_body: None,
            external_docs: None,
            security: None,
            servers: Vec::new(),
            x_tags: Vec::new(),
            x_deprecated: false,
            x_responses: Responses::default_references(),
            x_exclude: false,
        }
    }
}

impl RouteDoc {
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared parameters in declaration order, not yet deduplicated
    pub fn parameters(&self) -> &[RefOr<Parameter>] {
        &self.parameters
    }

    pub const fn request_body(&self) -> Option<&RefOr<RequestBody>> {
        self.request_body.as_ref()
    }

    pub const fn external_docs(&self) -> Option<&ExternalDocumentation> {
        self.external_docs.as_ref()
    }

    pub fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn tags(&self) -> &[Tag] {
        &self.x_tags
    }

    pub const fn is_deprecated(&self) -> bool {
        self.x_deprecated
    }

    pub const fn responses(&self) -> &Responses {
        &self.x_responses
    }

    pub const fn is_excluded(&self) -> bool {
        self.x_exclude
    }
}

impl WireObject for RouteDoc {
    fn kind(&self) -> WireKind {
        WireKind::RouteDoc
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("summary", Field::opt_str(&self.summary)),
            ("description", Field::opt_str(&self.description)),
            ("parameters", Field::objects(&self.parameters)),
            ("request_body", Field::opt_object(&self.request_body)),
            ("external_docs", Field::opt_object(&self.external_docs)),
            (
                "security",
                self.security
                    .as_deref()
                    .map_or(Field::Absent, Field::objects),
            ),
            ("servers", Field::objects(&self.servers)),
            ("x_tags", Field::objects(&self.x_tags)),
            ("x_deprecated", Field::Bool(self.x_deprecated)),
            ("x_responses", Field::Object(&self.x_responses)),
            ("x_exclude", Field::Bool(self.x_exclude)),
        ])
    }
}

/// Handler documentation plus the tags it references.
///
/// Build one per API definition and hand it to the assembler; nothing is
/// global, so two definitions never see each other's metadata.
#[derive(Debug, Clone, Default)]
pub struct DocRegistry {
    entries: IndexMap<HandlerId, RouteDoc>,
    tags: TagRegistry,
}

impl DocRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or continue) documenting `handler`
    pub fn handler(&mut self, handler: impl Into<HandlerId>) -> RouteDocBuilder<'_> {
        let handler = handler.into();
        let doc = self.entries.entry(handler.clone()).or_default();
        RouteDocBuilder {
            handler,
            doc,
            tags: &mut self.tags,
        }
    }

    pub fn entry(&self, handler: &HandlerId) -> Option<&RouteDoc> {
        self.entries.get(handler)
    }

    pub const fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub const fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HandlerId, &RouteDoc)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fluent attachment of documentation to one handler
pub struct RouteDocBuilder<'a> {
    handler: HandlerId,
    doc: &'a mut RouteDoc,
    tags: &'a mut TagRegistry,
}

impl RouteDocBuilder<'_> {
    #[must_use]
    pub const fn deprecated(self) -> Self {
        self.doc.x_deprecated = true;
        self
    }

    /// Hide the handler's operations from the public document
    #[must_use]
    pub const fn exclude(self) -> Self {
        self.doc.x_exclude = true;
        self
    }

    /// Last call wins
    #[must_use]
    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.doc.summary = Some(summary.into());
        self
    }

    /// Last call wins
    #[must_use]
    pub fn description(self, description: impl Into<String>) -> Self {
        self.doc.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn external_docs(self, docs: ExternalDocumentation) -> Self {
        self.doc.external_docs = Some(docs);
        self
    }

    /// Declare a parameter. One with no schema, choices or content is
    /// documented as a string.
    ///
    /// # Errors
    /// Fails like [`ParameterBuilder::build`]
    pub fn parameter(self, parameter: ParameterBuilder) -> Result<Self> {
        let parameter = if parameter.lacks_schema() {
            parameter.schema(Schema::string())
        } else {
            parameter
        };
        let parameter = parameter.build()?;
        tracing::trace!(handler = %self.handler, parameter = parameter.name(), "staged parameter");
        self.doc.parameters.push(RefOr::Item(parameter));
        Ok(self)
    }

    /// Declare a parameter defined in the components
    #[must_use]
    pub fn parameter_ref(self, reference: Reference) -> Self {
        self.doc.parameters.push(RefOr::Ref(reference));
        self
    }

    /// Set the response for one status code
    #[must_use]
    pub fn response(self, status: impl ToString, response: impl Into<RefOr<Response>>) -> Self {
        self.doc.x_responses.insert(status.to_string(), response.into());
        self
    }

    /// Overlay `responses` on the staged ones, or replace them entirely
    /// (dropping the default references) when `no_defaults` is set
    #[must_use]
    pub fn responses(self, responses: Responses, no_defaults: bool) -> Self {
        if no_defaults {
            self.doc.x_responses = responses;
        } else {
            self.doc.x_responses.extend(responses);
        }
        self
    }

    #[must_use]
    pub fn request_body(self, body: impl Into<RefOr<RequestBody>>) -> Self {
        self.doc.request_body = Some(body.into());
        self
    }

    /// Tag the handler's operations, creating the tag on first use
    ///
    /// # Errors
    /// Fails like [`TagRegistry::resolve`]
    pub fn tag(self, name: &str, description: Option<&str>) -> Result<Self> {
        let tag = self.tags.resolve(name, description)?;
        if !self.doc.x_tags.iter().any(|staged| staged.name() == tag.name()) {
            self.doc.x_tags.push(tag);
        }
        Ok(self)
    }

    /// Override document security; an empty list makes the operations public
    #[must_use]
    pub fn security(self, requirements: Vec<SecurityRequirement>) -> Self {
        self.doc.security = Some(requirements);
        self
    }

    #[must_use]
    pub fn servers(self, servers: Vec<Server>) -> Self {
        self.doc.servers = servers;
        self
    }
}

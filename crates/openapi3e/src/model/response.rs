//! Responses, request bodies and links

use super::media::{Header, MediaType};
use super::reference::{RefOr, Reference, ref_or_from};
use super::server::Server;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;
use serde_json::Value;

/// Status codes every operation references by default, with the
/// description of the matching component response
pub const DEFAULT_RESPONSES: &[(&str, &str)] = &[
    ("200", "OK"),
    ("400", "Bad Request"),
    ("401", "Unauthorized"),
    ("403", "Forbidden"),
    ("404", "Not Found"),
    ("405", "Method Not Allowed"),
    ("410", "Gone"),
    ("500", "Internal Server Error"),
];

/// Description used for a default component response
pub fn default_description(code: &str) -> Option<&'static str> {
    DEFAULT_RESPONSES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    description: String,
    headers: IndexMap<String, RefOr<Header>>,
    content: IndexMap<String, MediaType>,
    links: IndexMap<String, RefOr<Link>>,
}

ref_or_from!(Response);

impl Response {
    /// # Errors
    /// Returns `MissingField` when `description` is blank
    pub fn new(description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        require_text(&description, "Response", "description")?;
        Ok(Self {
            description,
            headers: IndexMap::new(),
            content: IndexMap::new(),
            links: IndexMap::new(),
        })
    }

    /// One of the fixed default descriptions, known to be non-blank
    pub(crate) fn from_static(description: &'static str) -> Self {
        Self {
            description: description.to_string(),
            headers: IndexMap::new(),
            content: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Self {
        self.headers.insert(name.into(), header.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.content.insert(content_type.into(), media);
        self
    }

    #[must_use]
    pub fn with_link(mut self, name: impl Into<String>, link: impl Into<RefOr<Link>>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl WireObject for Response {
    fn kind(&self) -> WireKind {
        WireKind::Response
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("description", Field::Str(&self.description)),
            ("headers", Field::object_map(&self.headers)),
            ("content", Field::object_map(&self.content)),
            ("links", Field::object_map(&self.links)),
        ])
    }
}

/// Status code (or `default`) to response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses {
    entries: IndexMap<String, RefOr<Response>>,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// References to the default component responses
    pub fn default_references() -> Self {
        Self {
            entries: DEFAULT_RESPONSES
                .iter()
                .map(|(code, _)| ((*code).to_string(), RefOr::Ref(Reference::response(code))))
                .collect(),
        }
    }

    /// Insert or replace the entry for `status`
    pub fn insert(&mut self, status: impl Into<String>, response: impl Into<RefOr<Response>>) {
        self.entries.insert(status.into(), response.into());
    }

    #[must_use]
    pub fn with(mut self, status: impl Into<String>, response: impl Into<RefOr<Response>>) -> Self {
        self.insert(status, response);
        self
    }

    /// Overlay `other` on top of these entries
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, status: &str) -> Option<&RefOr<Response>> {
        self.entries.get(status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefOr<Response>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WireObject for Responses {
    fn kind(&self) -> WireKind {
        WireKind::Responses
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Keyed(
            self.entries
                .iter()
                .map(|(status, response)| (status.as_str(), Field::Object(response)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    description: Option<String>,
    content: IndexMap<String, MediaType>,
    required: bool,
}

ref_or_from!(RequestBody);

impl RequestBody {
    pub fn new(content_type: impl Into<String>, media: MediaType) -> Self {
        let mut content = IndexMap::new();
        content.insert(content_type.into(), media);
        Self {
            description: None,
            content,
            required: false,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content_type: impl Into<String>, media: MediaType) -> Self {
        self.content.insert(content_type.into(), media);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// # Errors
    /// Returns `MissingField` when there is no content
    pub fn validate(&self) -> Result<()> {
        if self.content.is_empty() {
            return Err(OpenApiError::MissingField {
                object: "RequestBody",
                field: "content",
            });
        }
        Ok(())
    }
}

impl WireObject for RequestBody {
    fn kind(&self) -> WireKind {
        WireKind::RequestBody
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("description", Field::opt_str(&self.description)),
            ("content", Field::object_map(&self.content)),
            ("required", Field::Bool(self.required)),
        ])
    }
}

/// A design-time link from a response to another operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    operation_ref: Option<String>,
    operation_id: Option<String>,
    /// JSON object of parameter name to value or runtime expression
    parameters: Option<Value>,
    request_body: Option<Value>,
    description: Option<String>,
    server: Option<Server>,
}

ref_or_from!(Link);

impl Link {
    pub fn builder() -> LinkBuilder {
        LinkBuilder::default()
    }
}

impl WireObject for Link {
    fn kind(&self) -> WireKind {
        WireKind::Link
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("operation_ref", Field::opt_str(&self.operation_ref)),
            ("operation_id", Field::opt_str(&self.operation_id)),
            ("parameters", Field::opt_json(&self.parameters)),
            ("request_body", Field::opt_json(&self.request_body)),
            ("description", Field::opt_str(&self.description)),
            ("server", Field::opt_object(&self.server)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    link: Link,
}

impl LinkBuilder {
    #[must_use]
    pub fn operation_ref(mut self, operation_ref: impl Into<String>) -> Self {
        self.link.operation_ref = Some(operation_ref.into());
        self
    }

    #[must_use]
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.link.operation_id = Some(operation_id.into());
        self
    }

    /// A parameter value, usually a runtime expression such as `$response.body#/id`
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        let parameters = self
            .link
            .parameters
            .get_or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(map) = parameters {
            map.insert(name.into(), value);
        }
        self
    }

    #[must_use]
    pub fn request_body(mut self, value: Value) -> Self {
        self.link.request_body = Some(value);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.link.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn server(mut self, server: Server) -> Self {
        self.link.server = Some(server);
        self
    }

    /// # Errors
    /// Returns `InvalidCombination` unless exactly one of `operationRef`
    /// and `operationId` is set
    pub fn build(self) -> Result<Link> {
        if self.link.operation_ref.is_some() == self.link.operation_id.is_some() {
            return Err(OpenApiError::InvalidCombination {
                object: "Link",
                reason: "exactly one of operationRef and operationId is required".to_string(),
            });
        }
        Ok(self.link)
    }
}

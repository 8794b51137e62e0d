//! Operations and callbacks

use super::parameter::{Parameter, ParameterMap, parameters_field};
use super::path::PathItem;
use super::reference::{RefOr, ref_or_from};
use super::response::{RequestBody, Responses};
use super::security::SecurityRequirement;
use super::server::Server;
use super::tag::ExternalDocumentation;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result, require_text};
use indexmap::IndexMap;

/// One HTTP method's behavior on one path
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    external_docs: Option<ExternalDocumentation>,
    operation_id: String,
    /// Keyed by parameter name, or by pointer for `$ref` entries
    parameters: ParameterMap,
    request_body: Option<RefOr<RequestBody>>,
    responses: Responses,
    callbacks: IndexMap<String, RefOr<Callback>>,
    deprecated: bool,
    security: Option<Vec<SecurityRequirement>>,
    servers: Vec<Server>,
}

impl Operation {
    /// # Errors
    /// - `MissingField` for a blank operationId
    /// - `MissingField` when `responses` is empty
    pub fn new(operation_id: impl Into<String>, responses: Responses) -> Result<Self> {
        let operation_id = operation_id.into();
        require_text(&operation_id, "Operation", "operationId")?;
        if responses.is_empty() {
            return Err(OpenApiError::MissingField {
                object: "Operation",
                field: "responses",
            });
        }
        Ok(Self {
            tags: Vec::new(),
            summary: None,
            description: None,
            external_docs: None,
            operation_id,
            parameters: IndexMap::new(),
            request_body: None,
            responses,
            callbacks: IndexMap::new(),
            deprecated: false,
            security: None,
            servers: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_external_docs(mut self, docs: Option<ExternalDocumentation>) -> Self {
        self.external_docs = docs;
        self
    }

    /// Add a parameter; one with the same name and location replaces the
    /// earlier one
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<RefOr<Parameter>>) -> Self {
        let parameter = parameter.into();
        self.parameters.insert(parameter.key(), parameter);
        self
    }

    #[must_use]
    pub fn with_request_body(mut self, body: Option<RefOr<RequestBody>>) -> Self {
        self.request_body = body;
        self
    }

    #[must_use]
    pub fn with_callback(mut self, name: impl Into<String>, callback: impl Into<RefOr<Callback>>) -> Self {
        self.callbacks.insert(name.into(), callback.into());
        self
    }

    #[must_use]
    pub const fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Override document security; `Some(vec![])` removes authentication
    #[must_use]
    pub fn with_security(mut self, security: Option<Vec<SecurityRequirement>>) -> Self {
        self.security = security;
        self
    }

    #[must_use]
    pub fn with_servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub const fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn parameters(&self) -> impl Iterator<Item = &RefOr<Parameter>> {
        self.parameters.values()
    }
}

impl WireObject for Operation {
    fn kind(&self) -> WireKind {
        WireKind::Operation
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("tags", Field::Strs(&self.tags)),
            ("summary", Field::opt_str(&self.summary)),
            ("description", Field::opt_str(&self.description)),
            ("external_docs", Field::opt_object(&self.external_docs)),
            ("operation_id", Field::Str(&self.operation_id)),
            ("parameters", parameters_field(&self.parameters)),
            ("request_body", Field::opt_object(&self.request_body)),
            ("responses", Field::Object(&self.responses)),
            ("callbacks", Field::object_map(&self.callbacks)),
            ("deprecated", Field::Bool(self.deprecated)),
            (
                "security",
                self.security
                    .as_deref()
                    .map_or(Field::Absent, Field::objects),
            ),
            ("servers", Field::objects(&self.servers)),
        ])
    }
}

/// Runtime expression to the path item describing the out-of-band request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    entries: IndexMap<String, PathItem>,
}

ref_or_from!(Callback);

impl Callback {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, expression: impl Into<String>, path_item: PathItem) -> Self {
        self.entries.insert(expression.into(), path_item);
        self
    }
}

impl WireObject for Callback {
    fn kind(&self) -> WireKind {
        WireKind::Callback
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Keyed(
            self.entries
                .iter()
                .map(|(expression, item)| (expression.as_str(), Field::Object(item)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, Location, Response, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ok() -> Responses {
        Responses::new().with("200", Response::new("OK").unwrap())
    }

    #[test]
    fn test_operation_requires_id_and_responses() {
        assert!(matches!(
            Operation::new("", ok()),
            Err(OpenApiError::MissingField { field: "operationId", .. })
        ));
        assert!(matches!(
            Operation::new("listPets", Responses::new()),
            Err(OpenApiError::MissingField { field: "responses", .. })
        ));
    }

    #[test]
    fn test_parameters_serialize_as_a_list() {
        let operation = Operation::new("getPet", ok())
            .unwrap()
            .with_parameter(Parameter::path("id", Some(Schema::integer())))
            .with_parameter(
                Parameter::builder("verbose", Location::Query)
                    .schema(Schema::string())
                    .build()
                    .unwrap(),
            );

        assert_eq!(
            operation.to_wire()["parameters"],
            json!([
                {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}},
                {"name": "verbose", "in": "query", "schema": {"type": "string"}}
            ])
        );
    }

    #[test]
    fn test_same_name_in_different_locations_are_distinct() {
        let query = Parameter::builder("trace", Location::Query).build().unwrap();
        let header = Parameter::builder("trace", Location::Header).build().unwrap();
        let operation = Operation::new("search", ok())
            .unwrap()
            .with_parameter(query)
            .with_parameter(header.clone())
            .with_parameter(header);

        assert_eq!(
            operation.to_wire()["parameters"],
            json!([
                {"name": "trace", "in": "query"},
                {"name": "trace", "in": "header"}
            ])
        );
    }

    #[test]
    fn test_empty_security_override_is_emitted() {
        let open = Operation::new("health", ok())
            .unwrap()
            .with_security(Some(Vec::new()));
        assert_eq!(open.to_wire()["security"], json!([]));

        let inherited = Operation::new("health", ok()).unwrap();
        assert!(inherited.to_wire().get("security").is_none());
    }

    #[test]
    fn test_callback_wire_form() {
        let mut item = PathItem::default();
        item.set_operation(HttpMethod::Post, Operation::new("onEvent", ok()).unwrap());
        let operation = Operation::new("subscribe", ok())
            .unwrap()
            .with_callback("event", Callback::new().with("{$request.body#/url}", item));

        assert_eq!(
            operation.to_wire()["callbacks"],
            json!({
                "event": {
                    "{$request.body#/url}": {
                        "post": {
                            "operationId": "onEvent",
                            "responses": {"200": {"description": "OK"}}
                        }
                    }
                }
            })
        );
    }
}

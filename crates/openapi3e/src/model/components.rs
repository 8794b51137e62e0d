//! The document-wide container of reusable objects

use super::media::{Example, Header};
use super::operation::Callback;
use super::parameter::Parameter;
use super::reference::RefOr;
use super::response::{Link, RequestBody, Response};
use super::schema::Schema;
use super::security::SecurityScheme;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    schemas: IndexMap<String, RefOr<Schema>>,
    responses: IndexMap<String, RefOr<Response>>,
    parameters: IndexMap<String, RefOr<Parameter>>,
    examples: IndexMap<String, RefOr<Example>>,
    request_bodies: IndexMap<String, RefOr<RequestBody>>,
    headers: IndexMap<String, RefOr<Header>>,
    security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
    links: IndexMap<String, RefOr<Link>>,
    callbacks: IndexMap<String, RefOr<Callback>>,
}

fn insert_unique<T>(
    map: &mut IndexMap<String, T>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<()> {
    match map.entry(name) {
        Entry::Occupied(entry) => Err(OpenApiError::DuplicateComponent {
            kind,
            name: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_schema(&mut self, name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> Result<()> {
        insert_unique(&mut self.schemas, "schema", name.into(), schema.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_response(
        &mut self,
        name: impl Into<String>,
        response: impl Into<RefOr<Response>>,
    ) -> Result<()> {
        insert_unique(&mut self.responses, "response", name.into(), response.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        parameter: impl Into<RefOr<Parameter>>,
    ) -> Result<()> {
        insert_unique(&mut self.parameters, "parameter", name.into(), parameter.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_example(&mut self, name: impl Into<String>, example: impl Into<RefOr<Example>>) -> Result<()> {
        insert_unique(&mut self.examples, "example", name.into(), example.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_request_body(
        &mut self,
        name: impl Into<String>,
        body: impl Into<RefOr<RequestBody>>,
    ) -> Result<()> {
        insert_unique(&mut self.request_bodies, "requestBody", name.into(), body.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_header(&mut self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Result<()> {
        insert_unique(&mut self.headers, "header", name.into(), header.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_security_scheme(
        &mut self,
        name: impl Into<String>,
        scheme: impl Into<RefOr<SecurityScheme>>,
    ) -> Result<()> {
        insert_unique(&mut self.security_schemes, "securityScheme", name.into(), scheme.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_link(&mut self, name: impl Into<String>, link: impl Into<RefOr<Link>>) -> Result<()> {
        insert_unique(&mut self.links, "link", name.into(), link.into())
    }

    /// # Errors
    /// Returns `DuplicateComponent` when `name` is taken
    pub fn add_callback(
        &mut self,
        name: impl Into<String>,
        callback: impl Into<RefOr<Callback>>,
    ) -> Result<()> {
        insert_unique(&mut self.callbacks, "callback", name.into(), callback.into())
    }

    pub fn schema(&self, name: &str) -> Option<&RefOr<Schema>> {
        self.schemas.get(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&RefOr<Parameter>> {
        self.parameters.get(name)
    }

    pub fn has_response(&self, name: &str) -> bool {
        self.responses.contains_key(name)
    }

    /// Add a response unless one of that name exists
    pub(crate) fn ensure_response(&mut self, name: &str, response: impl FnOnce() -> Response) {
        if !self.responses.contains_key(name) {
            self.responses.insert(name.to_string(), RefOr::Item(response()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.responses.is_empty()
            && self.parameters.is_empty()
            && self.examples.is_empty()
            && self.request_bodies.is_empty()
            && self.headers.is_empty()
            && self.security_schemes.is_empty()
            && self.links.is_empty()
            && self.callbacks.is_empty()
    }
}

impl WireObject for Components {
    fn kind(&self) -> WireKind {
        WireKind::Components
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Named(vec![
            ("schemas", Field::object_map(&self.schemas)),
            ("responses", Field::object_map(&self.responses)),
            ("parameters", Field::object_map(&self.parameters)),
            ("examples", Field::object_map(&self.examples)),
            ("request_bodies", Field::object_map(&self.request_bodies)),
            ("headers", Field::object_map(&self.headers)),
            ("security_schemes", Field::object_map(&self.security_schemes)),
            ("links", Field::object_map(&self.links)),
            ("callbacks", Field::object_map(&self.callbacks)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reference;
    use serde_json::json;

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut components = Components::new();
        components.add_schema("Pet", Schema::string()).unwrap();

        let result = components.add_schema("Pet", Reference::schema("Other"));
        assert!(matches!(
            result,
            Err(OpenApiError::DuplicateComponent { kind: "schema", name }) if name == "Pet"
        ));

        // Same name in another section is fine
        components
            .add_response("Pet", Response::new("A pet").unwrap())
            .unwrap();
    }

    #[test]
    fn test_schemas_are_emitted_sorted() {
        let mut components = Components::new();
        components.add_schema("Zebra", Schema::string()).unwrap();
        components.add_schema("Ant", Schema::integer()).unwrap();
        components
            .add_response("404", Response::new("Not Found").unwrap())
            .unwrap();
        components
            .add_response("200", Response::new("OK").unwrap())
            .unwrap();

        let wire = components.to_wire();
        let schemas: Vec<&String> = wire["schemas"].as_object().unwrap().keys().collect();
        let responses: Vec<&String> = wire["responses"].as_object().unwrap().keys().collect();
        assert_eq!(schemas, ["Ant", "Zebra"]);
        assert_eq!(responses, ["404", "200"]);
    }

    #[test]
    fn test_ensure_response_keeps_existing() {
        let mut components = Components::new();
        components
            .add_response("404", Response::new("No such pet").unwrap())
            .unwrap();
        components.ensure_response("404", || Response::new("Not Found").unwrap());
        components.ensure_response("500", || Response::new("Internal Server Error").unwrap());

        let wire = components.to_wire();
        assert_eq!(wire["responses"]["404"], json!({"description": "No such pet"}));
        assert_eq!(
            wire["responses"]["500"],
            json!({"description": "Internal Server Error"})
        );
    }
}

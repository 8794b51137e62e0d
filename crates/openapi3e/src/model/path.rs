//! Path items, HTTP methods and the paths collection

use super::operation::Operation;
use super::parameter::{Parameter, ParameterMap, parameters_field};
use super::reference::RefOr;
use super::server::Server;
use super::wire::{Field, Fields, WireKind, WireObject};
use crate::error::{OpenApiError, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Methods a path item can document, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Lower-case name, as used for the path item key
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_upper().eq_ignore_ascii_case(s))
            .ok_or_else(|| OpenApiError::InvalidType {
                object: "PathItem",
                field: "method",
                expected: "get, put, post, delete, options, head, patch, trace",
                found: s.to_string(),
            })
    }
}

/// The operations available on one URI template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    summary: Option<String>,
    description: Option<String>,
    operations: BTreeMap<HttpMethod, Operation>,
    servers: Vec<Server>,
    parameters: ParameterMap,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    /// Parameters shared by every operation on the path
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        let parameter = RefOr::Item(parameter);
        self.parameters.insert(parameter.key(), parameter);
        self
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }

    /// Set the operation for `method`, returning the one it replaces
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.operations.insert(method, operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        self.operations.iter().map(|(method, op)| (*method, op))
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl WireObject for PathItem {
    fn kind(&self) -> WireKind {
        WireKind::PathItem
    }

    fn fields(&self) -> Fields<'_> {
        let mut fields = vec![
            ("summary", Field::opt_str(&self.summary)),
            ("description", Field::opt_str(&self.description)),
        ];
        for method in HttpMethod::ALL {
            let field = self
                .operations
                .get(&method)
                .map_or(Field::Absent, |operation| Field::Object(operation));
            fields.push((method.as_str(), field));
        }
        fields.push(("servers", Field::objects(&self.servers)));
        fields.push(("parameters", parameters_field(&self.parameters)));
        Fields::Named(fields)
    }
}

/// URI template to path item, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    entries: IndexMap<String, PathItem>,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `DuplicatePath` when `uri` is already present
    pub fn insert(&mut self, uri: impl Into<String>, item: PathItem) -> Result<()> {
        match self.entries.entry(uri.into()) {
            Entry::Occupied(entry) => Err(OpenApiError::DuplicatePath {
                uri: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    pub fn get(&self, uri: &str) -> Option<&PathItem> {
        self.entries.get(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.entries.iter().map(|(uri, item)| (uri.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WireObject for Paths {
    fn kind(&self) -> WireKind {
        WireKind::Paths
    }

    fn fields(&self) -> Fields<'_> {
        Fields::Keyed(
            self.entries
                .iter()
                .map(|(uri, item)| (uri.as_str(), Field::Object(item)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Response, Responses};
    use serde_json::json;

    fn operation(id: &str) -> Operation {
        Operation::new(id, Responses::new().with("200", Response::new("OK").unwrap())).unwrap()
    }

    #[test]
    fn test_method_parsing_and_display() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("CONNECT".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_methods_emit_in_fixed_order() {
        let mut item = PathItem::new();
        item.set_operation(HttpMethod::Delete, operation("deletePet"));
        item.set_operation(HttpMethod::Get, operation("getPet"));

        let wire = item.to_wire();
        let keys: Vec<&String> = wire.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["get", "delete"]);
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut paths = Paths::new();
        paths.insert("/pets", PathItem::new()).unwrap();
        assert!(matches!(
            paths.insert("/pets", PathItem::new()),
            Err(OpenApiError::DuplicatePath { uri }) if uri == "/pets"
        ));
    }

    #[test]
    fn test_paths_keep_insertion_order() {
        let mut paths = Paths::new();
        for uri in ["/zoo", "/animals", "/pets"] {
            let mut item = PathItem::new();
            item.set_operation(HttpMethod::Get, operation(uri));
            paths.insert(uri, item).unwrap();
        }

        let wire = paths.to_wire();
        let keys: Vec<&String> = wire.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["/zoo", "/animals", "/pets"]);
        assert_eq!(wire["/pets"], json!({"get": {"operationId": "/pets", "responses": {"200": {"description": "OK"}}}}));
    }
}

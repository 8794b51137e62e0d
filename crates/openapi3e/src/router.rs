//! The route table the assembler walks
//!
//! Routes are described the way a router knows them: a URI template with
//! typed placeholders such as `/users/<id:int>`, the methods it serves,
//! the handler (or per-method handlers) behind it and the group it was
//! registered under.

use crate::model::{HttpMethod, Schema};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Placeholder marking a route that serves files below a directory
pub const FILE_URI_PLACEHOLDER: &str = "<file_uri";

fn placeholder_regex() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)(?::([^>]+))?>").ok())
        .as_ref()
}

/// Stable identity of a handler, the key of the metadata registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(String);

impl HandlerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for HandlerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Type annotation of a path placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamCast {
    Int,
    Float,
    Str,
    /// Router-specific patterns such as `path` or a regex; no schema is inferred
    Custom(String),
}

impl ParamCast {
    pub fn parse(cast: &str) -> Self {
        match cast {
            "int" => Self::Int,
            "float" | "number" => Self::Float,
            "str" | "string" => Self::Str,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The shared primitive schema for this cast, if it has one
    pub fn schema(&self) -> Option<&'static Schema> {
        match self {
            Self::Int => Some(Schema::integer()),
            Self::Float => Some(Schema::number()),
            Self::Str => Some(Schema::string()),
            Self::Custom(_) => None,
        }
    }
}

/// A placeholder recognized in a route's URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParameter {
    pub name: String,
    pub cast: Option<ParamCast>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHandler {
    /// One handler serving every method of the route
    Single(HandlerId),
    /// A dispatcher with a handler per method
    Composite(IndexMap<HttpMethod, HandlerId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    uri: String,
    methods: Vec<HttpMethod>,
    handler: RouteHandler,
    group: Option<String>,
    static_files: bool,
}

impl Route {
    pub fn new(
        uri: impl Into<String>,
        methods: impl IntoIterator<Item = HttpMethod>,
        handler: impl Into<HandlerId>,
    ) -> Self {
        Self {
            uri: uri.into(),
            methods: methods.into_iter().collect(),
            handler: RouteHandler::Single(handler.into()),
            group: None,
            static_files: false,
        }
    }

    /// A route dispatching each method to its own handler
    pub fn composite(
        uri: impl Into<String>,
        handlers: impl IntoIterator<Item = (HttpMethod, HandlerId)>,
    ) -> Self {
        let handlers: IndexMap<HttpMethod, HandlerId> = handlers.into_iter().collect();
        Self {
            uri: uri.into(),
            methods: handlers.keys().copied().collect(),
            handler: RouteHandler::Composite(handlers),
            group: None,
            static_files: false,
        }
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Mark the route as serving static files
    #[must_use]
    pub const fn static_files(mut self) -> Self {
        self.static_files = true;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }

    pub const fn handler(&self) -> &RouteHandler {
        &self.handler
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_static(&self) -> bool {
        self.static_files || self.uri.contains(FILE_URI_PLACEHOLDER)
    }

    /// The handler for each method the route serves, in method order
    pub fn handlers(&self) -> Vec<(HttpMethod, &HandlerId)> {
        let mut pairs: Vec<(HttpMethod, &HandlerId)> = match &self.handler {
            RouteHandler::Single(handler) => {
                self.methods.iter().map(|method| (*method, handler)).collect()
            }
            RouteHandler::Composite(handlers) => handlers
                .iter()
                .map(|(method, handler)| (*method, handler))
                .collect(),
        };
        pairs.sort_by_key(|(method, _)| *method);
        pairs.dedup_by_key(|(method, _)| *method);
        pairs
    }

    pub fn parameters(&self) -> Vec<RouteParameter> {
        let Some(regex) = placeholder_regex() else {
            return Vec::new();
        };
        regex
            .captures_iter(&self.uri)
            .map(|captures| RouteParameter {
                name: captures[1].to_string(),
                cast: captures.get(2).map(|cast| ParamCast::parse(cast.as_str())),
            })
            .collect()
    }

    /// `/users/<id:int>` as `/users/{id}`
    pub fn wire_uri(&self) -> String {
        self.rewrite(|name| format!("{{{name}}}"))
    }

    /// `/users/<id:int>` as `/users/id`, the form operationIds are built from
    pub fn id_uri(&self) -> String {
        self.rewrite(str::to_string)
    }

    fn rewrite(&self, placeholder: impl Fn(&str) -> String) -> String {
        placeholder_regex().map_or_else(
            || self.uri.clone(),
            |regex| {
                regex
                    .replace_all(&self.uri, |captures: &regex::Captures<'_>| {
                        placeholder(&captures[1])
                    })
                    .into_owned()
            },
        )
    }
}

/// Anything that can list its routes
pub trait RouteSource {
    /// Routes in the router's own order
    fn routes(&self) -> &[Route];

    /// Routes registered under `group`
    fn group_members(&self, group: &str) -> Vec<&Route> {
        self.routes()
            .iter()
            .filter(|route| route.group() == Some(group))
            .collect()
    }
}

/// A plain in-memory route table
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn add(&mut self, route: Route) {
        self.routes.push(route);
    }
}

impl RouteSource for RouteTable {
    fn routes(&self) -> &[Route] {
        &self.routes
    }
}

//! Assembly of route tables and staged documentation into a document

use crate::error::{OpenApiError, Result};
use crate::keyname::snake_to_camel;
use crate::model::response::default_description;
use crate::model::{
    Components, Contact, ExternalDocumentation, HttpMethod, Info, License, OpenApiDocument,
    Operation, Parameter, ParameterMap, PathItem, Paths, RefOr, Response, Schema,
    SecurityRequirement, Server, Tag, WireObject,
};
use crate::registry::{DocRegistry, RouteDoc};
use crate::router::{HandlerId, ParamCast, Route, RouteHandler, RouteSource};
use indexmap::IndexMap;
use openapi3e_config::DocsConfig;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Prepended to the summary of excluded operations when they are shown
pub const EXCLUDED_PREFIX: &str = "[excluded] ";

/// URI prefixes of the documentation endpoints themselves
pub const DEFAULT_SELF_PREFIXES: &[&str] = &["/openapi", "/swagger"];

/// What an operationId or cloak function is told about an operation
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    pub method: HttpMethod,
    /// The route URI with placeholders reduced to their names
    pub uri: &'a str,
    pub route: &'a Route,
    pub handler: &'a HandlerId,
}

pub type OperationIdFn = Arc<dyn Fn(&OperationContext<'_>) -> String + Send + Sync>;
pub type CloakFn = Arc<dyn Fn(&OperationContext<'_>) -> bool + Send + Sync>;

/// `GET /users/<id:int>` becomes `GET~~~users~id`
pub fn default_operation_id(context: &OperationContext<'_>) -> String {
    format!("{}~~{}", context.method.as_upper(), context.uri).replace('/', "~")
}

/// The handler name in camelCase, prefixed with the method when the route
/// serves several methods or dispatches per method
pub fn camel_case_operation_id(context: &OperationContext<'_>) -> String {
    let per_method = context.route.methods().len() > 1
        || matches!(context.route.handler(), RouteHandler::Composite(_));
    if per_method {
        snake_to_camel(&format!("{}_{}", context.method.as_str(), context.handler))
    } else {
        snake_to_camel(context.handler.as_str())
    }
}

/// Document-wide inputs to a build
#[derive(Clone)]
pub struct BuildOptions {
    pub info: Info,
    pub components: Components,
    pub servers: Vec<Server>,
    pub security: Vec<SecurityRequirement>,
    pub external_docs: Option<ExternalDocumentation>,
    /// Skip routes under `self_prefixes`
    pub hide_self: bool,
    pub self_prefixes: Vec<String>,
    /// Skip static file routes
    pub hide_static: bool,
    /// Also build the variant showing excluded operations
    pub show_excluded: bool,
    /// Keep registered tags no visible operation uses
    pub show_unused_tags: bool,
    pub operation_id_fn: OperationIdFn,
    pub cloak_fn: Option<CloakFn>,
}

impl BuildOptions {
    pub fn new(info: Info) -> Self {
        Self {
            info,
            components: Components::new(),
            servers: Vec::new(),
            security: Vec::new(),
            external_docs: None,
            hide_self: true,
            self_prefixes: DEFAULT_SELF_PREFIXES.iter().map(ToString::to_string).collect(),
            hide_static: true,
            show_excluded: false,
            show_unused_tags: false,
            operation_id_fn: Arc::new(default_operation_id),
            cloak_fn: None,
        }
    }

    /// Options for the configured info block and build switches
    ///
    /// # Errors
    /// Returns `MissingField` when the title, version or license name is blank
    pub fn from_config(config: &DocsConfig) -> Result<Self> {
        let source = &config.info;
        let mut info = Info::new(&source.title, &source.version)?;
        if !source.description.is_empty() {
            info = info.with_description(&source.description);
        }
        if let Some(url) = &source.terms_of_service_url {
            info = info.with_terms_of_service(url);
        }
        if source.has_contact() {
            info = info.with_contact(Contact {
                name: source.contact_name.clone(),
                url: source.contact_url.clone(),
                email: source.contact_email.clone(),
            });
        }
        if source.has_license() {
            let mut license = License::new(source.license_name.clone().unwrap_or_default())?;
            if let Some(url) = &source.license_url {
                license = license.with_url(url);
            }
            info = info.with_license(license);
        }

        let mut options = Self::new(info);
        options.hide_self = config.build.hide_self;
        options.hide_static = config.build.hide_static;
        options.show_excluded = config.build.show_excluded;
        options.show_unused_tags = config.build.show_unused_tags;
        Ok(options)
    }

    #[must_use]
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
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

    #[must_use]
    pub fn with_external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }

    #[must_use]
    pub fn with_operation_id_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&OperationContext<'_>) -> String + Send + Sync + 'static,
    {
        self.operation_id_fn = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_cloak_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&OperationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.cloak_fn = Some(Arc::new(f));
        self
    }

    /// A prefix matches whole segments only: `/openapi` hides
    /// `/openapi/spec.json` but not `/openapi-tools`
    fn is_self_route(&self, route: &Route) -> bool {
        let uri = route.uri();
        self.self_prefixes.iter().any(|prefix| {
            uri.strip_prefix(prefix.trim_end_matches('/'))
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("info", &self.info)
            .field("servers", &self.servers.len())
            .field("hide_self", &self.hide_self)
            .field("self_prefixes", &self.self_prefixes)
            .field("hide_static", &self.hide_static)
            .field("show_excluded", &self.show_excluded)
            .field("show_unused_tags", &self.show_unused_tags)
            .field("cloak_fn", &self.cloak_fn.is_some())
            .finish_non_exhaustive()
    }
}

/// Which operations and tags one document variant shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub hide_excluded: bool,
    pub hide_cloaked: bool,
    pub show_unused_tags: bool,
}

impl Visibility {
    /// Excluded and cloaked operations hidden
    pub const fn public(show_unused_tags: bool) -> Self {
        Self {
            hide_excluded: true,
            hide_cloaked: true,
            show_unused_tags,
        }
    }

    /// Cloaked operations shown, excluded ones still hidden
    pub const fn uncloaked() -> Self {
        Self {
            hide_excluded: true,
            hide_cloaked: false,
            show_unused_tags: true,
        }
    }

    /// Everything shown
    pub const fn all() -> Self {
        Self {
            hide_excluded: false,
            hide_cloaked: false,
            show_unused_tags: true,
        }
    }
}

/// Build one document variant.
///
/// Routes are visited in the router's order. Each (method, handler) pair
/// becomes an operation unless it is hidden; a URI whose operations are
/// all hidden does not appear.
///
/// # Errors
/// Any conflict found while merging parameters, resolving tags or
/// checking uniqueness aborts the build.
#[instrument(skip_all, fields(hide_excluded = visibility.hide_excluded, hide_cloaked = visibility.hide_cloaked))]
pub fn build(
    routes: &dyn RouteSource,
    registry: &DocRegistry,
    options: &BuildOptions,
    visibility: Visibility,
) -> Result<OpenApiDocument> {
    let undocumented = RouteDoc::default();
    let mut components = options.components.clone();
    let mut path_items: IndexMap<String, PathItem> = IndexMap::new();
    let mut operation_ids: HashMap<String, String> = HashMap::new();

    for route in routes.routes() {
        if options.hide_self && options.is_self_route(route) {
            debug!(uri = route.uri(), "skipping documentation route");
            continue;
        }
        if options.hide_static && route.is_static() {
            debug!(uri = route.uri(), "skipping static route");
            continue;
        }

        let wire_uri = route.wire_uri();
        let id_uri = route.id_uri();
        let inferred: Vec<Parameter> = route
            .parameters()
            .iter()
            .map(|p| Parameter::path(&p.name, p.cast.as_ref().and_then(ParamCast::schema)))
            .collect();

        for (method, handler) in route.handlers() {
            let doc = registry.entry(handler).unwrap_or(&undocumented);
            let context = OperationContext {
                method,
                uri: &id_uri,
                route,
                handler,
            };

            if doc.is_excluded() && visibility.hide_excluded {
                debug!(%method, uri = %wire_uri, %handler, "skipping excluded operation");
                continue;
            }
            if visibility.hide_cloaked
                && options.cloak_fn.as_ref().is_some_and(|cloak| cloak(&context))
            {
                debug!(%method, uri = %wire_uri, %handler, "skipping cloaked operation");
                continue;
            }
            if tracing::enabled!(tracing::Level::TRACE) {
                tracing::trace!(%handler, staged = %doc.to_debug_wire(), "documenting operation");
            }

            let operation = build_operation(&context, doc, &inferred, &components, options)?;

            let item = path_items.entry(wire_uri.clone()).or_default();
            if item.operation(method).is_some() {
                return Err(OpenApiError::DuplicateOperation {
                    method: method.to_string(),
                    uri: wire_uri,
                });
            }

            let location = format!("{method} {wire_uri}");
            if let Some(first) = operation_ids.insert(operation.operation_id().to_string(), location.clone()) {
                return Err(OpenApiError::DuplicateOperationId {
                    operation_id: operation.operation_id().to_string(),
                    first,
                    second: location,
                });
            }
            let _ = item.set_operation(method, operation);
        }
    }

    let mut paths = Paths::new();
    for (uri, item) in path_items {
        paths.insert(uri, item)?;
    }

    add_default_responses(&paths, &mut components);
    let tags = visible_tags(&paths, registry, visibility.show_unused_tags);

    let operation_count: usize = paths.iter().map(|(_, item)| item.operations().count()).sum();
    info!(
        paths = paths.len(),
        operations = operation_count,
        tags = tags.len(),
        "built OpenAPI document"
    );

    let document = OpenApiDocument::new(options.info.clone(), paths)
        .with_components(components)
        .with_servers(options.servers.clone())
        .with_security(options.security.clone())
        .with_tags(tags)?
        .with_external_docs(options.external_docs.clone());
    document.validate()?;
    Ok(document)
}

fn build_operation(
    context: &OperationContext<'_>,
    doc: &RouteDoc,
    inferred: &[Parameter],
    components: &Components,
    options: &BuildOptions,
) -> Result<Operation> {
    let parameters = merge_parameters(inferred, doc.parameters(), components)?;

    let mut tags: Vec<String> = doc.tags().iter().map(|tag| tag.name().to_string()).collect();
    if tags.is_empty()
        && let Some(group) = context.route.group()
    {
        tags.push(group.to_string());
    }
    tags.sort();
    tags.dedup();

    // Only reachable for excluded operations when the variant shows them
    let summary = if doc.is_excluded() {
        Some(format!("{EXCLUDED_PREFIX}{}", doc.summary().unwrap_or_default()))
    } else {
        doc.summary().map(str::to_string)
    };

    let operation_id = (options.operation_id_fn)(context);
    let operation = Operation::new(operation_id, doc.responses().clone())?
        .with_tags(tags)
        .with_summary(summary)
        .with_description(doc.description().map(str::to_string))
        .with_external_docs(doc.external_docs().cloned())
        .with_request_body(doc.request_body().cloned())
        .with_deprecated(doc.is_deprecated())
        .with_security(doc.security().map(<[SecurityRequirement]>::to_vec))
        .with_servers(doc.servers().to_vec());

    Ok(parameters
        .into_iter()
        .fold(operation, Operation::with_parameter))
}

/// Router-inferred parameters first, declared ones merged in by name and
/// location; a declared parameter in another location is a separate one
fn merge_parameters(
    inferred: &[Parameter],
    declared: &[RefOr<Parameter>],
    components: &Components,
) -> Result<Vec<RefOr<Parameter>>> {
    let mut merged: ParameterMap = inferred
        .iter()
        .map(|parameter| {
            let parameter = RefOr::Item(parameter.clone());
            (parameter.key(), parameter)
        })
        .collect();

    for parameter in declared {
        let key = parameter.key();
        let combined = match (merged.get(&key), parameter) {
            (Some(RefOr::Item(existing)), RefOr::Item(incoming)) => RefOr::Item(existing.merge(incoming)?),
            _ => parameter.clone(),
        };
        merged.insert(key, combined);
    }

    Ok(merged
        .into_values()
        .map(|parameter| match parameter {
            RefOr::Item(mut item) => {
                backfill_description(&mut item, components);
                RefOr::Item(item)
            }
            reference @ RefOr::Ref(_) => reference,
        })
        .collect())
}

/// Give a parameter whose schema is a `$ref` the description of the
/// referenced component schema (or of the component named like the
/// parameter), since renderers do not show descriptions through a `$ref`
fn backfill_description(parameter: &mut Parameter, components: &Components) {
    if parameter.description().is_some() {
        return;
    }
    let Some(RefOr::Ref(reference)) = parameter.schema() else {
        return;
    };

    let description = reference
        .component_name("schemas")
        .into_iter()
        .chain(std::iter::once(parameter.name()))
        .find_map(|name| {
            components
                .schema(name)
                .and_then(RefOr::as_item)
                .and_then(Schema::description)
        })
        .map(str::to_string);

    if let Some(description) = description {
        parameter.set_description(description);
    }
}

/// Define every default response some operation references
fn add_default_responses(paths: &Paths, components: &mut Components) {
    for (_, item) in paths.iter() {
        for (_, operation) in item.operations() {
            for (_, response) in operation.responses().iter() {
                let Some(code) = response
                    .as_ref_pointer()
                    .and_then(|reference| reference.component_name("responses"))
                else {
                    continue;
                };
                if let Some(description) = default_description(code) {
                    components.ensure_response(code, || Response::from_static(description));
                }
            }
        }
    }
}

/// Registered tags sorted by name, limited to those in use unless
/// `show_unused` is set
fn visible_tags(paths: &Paths, registry: &DocRegistry, show_unused: bool) -> Vec<Tag> {
    let used: HashSet<&str> = paths
        .iter()
        .flat_map(|(_, item)| item.operations())
        .flat_map(|(_, operation)| operation.tags().iter().map(String::as_str))
        .collect();

    let mut tags: Vec<Tag> = registry
        .tags()
        .iter()
        .filter(|tag| show_unused || used.contains(tag.name()))
        .cloned()
        .collect();
    tags.sort_by(|a, b| a.name().cmp(b.name()));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, Reference};
    use crate::router::RouteTable;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options() -> BuildOptions {
        BuildOptions::new(Info::new("API", "v1.0.0").unwrap())
    }

    fn context<'a>(route: &'a Route, method: HttpMethod, uri: &'a str) -> OperationContext<'a> {
        let RouteHandler::Single(handler) = route.handler() else {
            panic!("single handler expected");
        };
        OperationContext {
            method,
            uri,
            route,
            handler,
        }
    }

    #[test]
    fn test_default_operation_id() {
        let route = Route::new("/users/<id:int>", [HttpMethod::Get], "get_user");
        let id_uri = route.id_uri();
        assert_eq!(
            default_operation_id(&context(&route, HttpMethod::Get, &id_uri)),
            "GET~~~users~id"
        );
    }

    #[test]
    fn test_camel_case_operation_id() {
        let single = Route::new("/users", [HttpMethod::Get], "list_users");
        assert_eq!(
            camel_case_operation_id(&context(&single, HttpMethod::Get, "/users")),
            "listUsers"
        );

        let multi = Route::new("/users", [HttpMethod::Get, HttpMethod::Post], "users");
        assert_eq!(
            camel_case_operation_id(&context(&multi, HttpMethod::Post, "/users")),
            "postUsers"
        );
    }

    #[test]
    fn test_parameter_merge_keeps_route_order_and_appends_new() {
        let inferred = vec![Parameter::path("id", Some(Schema::integer()))];
        let declared = vec![
            RefOr::Item(
                Parameter::builder("verbose", Location::Query)
                    .schema(Schema::string())
                    .build()
                    .unwrap(),
            ),
            RefOr::Item(
                Parameter::builder("id", Location::Path)
                    .description("The id")
                    .build()
                    .unwrap(),
            ),
        ];

        let merged = merge_parameters(&inferred, &declared, &Components::new()).unwrap();
        let names: Vec<&str> = merged
            .iter()
            .filter_map(RefOr::as_item)
            .map(Parameter::name)
            .collect();
        assert_eq!(names, ["id", "verbose"]);
        assert_eq!(merged[0].as_item().unwrap().description(), Some("The id"));
    }

    #[test]
    fn test_description_backfilled_from_referenced_schema() {
        let mut components = Components::new();
        components
            .add_schema(
                "UserId",
                Schema::builder()
                    .schema_type(crate::model::SchemaType::Integer)
                    .description("A user's id")
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let declared = vec![RefOr::Item(
            Parameter::builder("id", Location::Path)
                .schema(Reference::schema("UserId"))
                .build()
                .unwrap(),
        )];
        let merged = merge_parameters(&[], &declared, &components).unwrap();
        assert_eq!(merged[0].as_item().unwrap().description(), Some("A user's id"));
    }

    #[test]
    fn test_group_name_is_the_fallback_tag() {
        let routes = RouteTable::new()
            .with(Route::new("/pets", [HttpMethod::Get], "list_pets").in_group("pets"));
        let document = build(&routes, &DocRegistry::new(), &options(), Visibility::public(false)).unwrap();

        assert_eq!(
            document.to_wire()["paths"]["/pets"]["get"]["tags"],
            json!(["pets"])
        );
    }

    #[test]
    fn test_default_responses_are_backfilled() {
        let routes = RouteTable::new().with(Route::new("/ping", [HttpMethod::Get], "ping"));
        let document = build(&routes, &DocRegistry::new(), &options(), Visibility::public(false)).unwrap();

        let wire = document.to_wire();
        assert_eq!(wire["components"]["responses"]["410"], json!({"description": "Gone"}));
        assert_eq!(
            wire["paths"]["/ping"]["get"]["responses"]["200"],
            json!({"$ref": "#/components/responses/200"})
        );
    }

    #[test]
    fn test_self_and_static_routes_are_hidden() {
        let routes = RouteTable::new()
            .with(Route::new("/openapi/spec.json", [HttpMethod::Get], "spec"))
            .with(Route::new("/static/<file_uri:path>", [HttpMethod::Get], "files"))
            .with(Route::new("/pets", [HttpMethod::Get], "pets"));

        let document = build(&routes, &DocRegistry::new(), &options(), Visibility::public(false)).unwrap();
        let uris: Vec<&str> = document.paths().iter().map(|(uri, _)| uri).collect();
        assert_eq!(uris, ["/pets"]);

        let lookalikes = RouteTable::new()
            .with(Route::new("/openapi", [HttpMethod::Get], "index"))
            .with(Route::new("/openapi-tools", [HttpMethod::Get], "tools"))
            .with(Route::new("/swagger-petstore/pets", [HttpMethod::Get], "petstore"));
        let document = build(&lookalikes, &DocRegistry::new(), &options(), Visibility::public(false)).unwrap();
        let uris: Vec<&str> = document.paths().iter().map(|(uri, _)| uri).collect();
        assert_eq!(uris, ["/openapi-tools", "/swagger-petstore/pets"]);

        let mut shown = options();
        shown.hide_self = false;
        shown.hide_static = false;
        let document = build(&routes, &DocRegistry::new(), &shown, Visibility::public(false)).unwrap();
        assert_eq!(document.paths().len(), 3);
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let routes = RouteTable::new()
            .with(Route::new("/pets", [HttpMethod::Get], "a"))
            .with(Route::new("/pets", [HttpMethod::Get], "b"));
        let options = options().with_operation_id_fn(|c: &OperationContext<'_>| c.handler.to_string());

        let result = build(&routes, &DocRegistry::new(), &options, Visibility::public(false));
        assert!(matches!(result, Err(OpenApiError::DuplicateOperation { .. })));
    }

    #[test]
    fn test_duplicate_operation_reported_before_its_id() {
        let routes = RouteTable::new()
            .with(Route::new("/pets", [HttpMethod::Get], "a"))
            .with(Route::new("/pets", [HttpMethod::Get], "b"));

        let result = build(&routes, &DocRegistry::new(), &options(), Visibility::public(false));
        assert!(matches!(
            result,
            Err(OpenApiError::DuplicateOperation { method, uri }) if method == "GET" && uri == "/pets"
        ));
    }

    #[test]
    fn test_duplicate_operation_id_is_rejected() {
        let routes = RouteTable::new()
            .with(Route::new("/pets", [HttpMethod::Get], "list"))
            .with(Route::new("/animals", [HttpMethod::Get], "list"));
        let options = options().with_operation_id_fn(camel_case_operation_id);

        let result = build(&routes, &DocRegistry::new(), &options, Visibility::public(false));
        assert!(matches!(
            result,
            Err(OpenApiError::DuplicateOperationId { operation_id, .. }) if operation_id == "list"
        ));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = DocsConfig::default();
        config.info.license_name = Some("MIT".to_string());
        config.info.contact_email = Some("api@example.com".to_string());
        config.build.show_excluded = true;

        let options = BuildOptions::from_config(&config).unwrap();
        assert!(options.show_excluded);
        assert!(options.hide_self);

        let wire = crate::model::WireObject::to_wire(&options.info);
        assert_eq!(
            wire,
            json!({
                "title": "API",
                "description": "Description",
                "contact": {"email": "api@example.com"},
                "license": {"name": "MIT"},
                "version": "v1.0.0"
            })
        );
    }
}

//! End-to-end document assembly from route tables and staged handler docs

use openapi3e::model::{
    HttpMethod, Info, Location, Parameter, Reference, Response, Responses, Schema, SchemaType,
    WireObject,
};
use openapi3e::{
    BuildOptions, DocRegistry, DocumentCache, OpenApiError, OperationContext, Route, RouteTable,
    SpecFormat, SpecVariant, Visibility, build, camel_case_operation_id,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn options() -> BuildOptions {
    BuildOptions::new(Info::new("Pet Store", "v1.0.0").unwrap())
}

fn parse(cache: &DocumentCache, variant: SpecVariant) -> Option<Value> {
    cache
        .get(variant, SpecFormat::Json)
        .map(|json| serde_json::from_str(json).unwrap())
}

#[test]
fn test_typed_path_parameter_end_to_end() {
    let routes = RouteTable::new().with(Route::new("/users/<id:int>", [HttpMethod::Get], "get_user"));
    let mut registry = DocRegistry::new();
    registry
        .handler("get_user")
        .parameter(
            Parameter::builder("id", Location::Path)
                .required(true)
                .schema(Schema::integer()),
        )
        .unwrap();

    let document = build(&routes, &registry, &options(), Visibility::public(false)).unwrap();
    let wire = document.to_wire();

    let get = &wire["paths"]["/users/{id}"]["get"];
    assert_eq!(
        get["parameters"],
        json!([{"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}])
    );
    assert_eq!(get["operationId"], "GET~~~users~id");
    assert_eq!(wire["openapi"], "3.0.2");
}

#[test]
fn test_undocumented_route_still_gets_inferred_parameters() {
    let routes = RouteTable::new().with(Route::new(
        "/orders/<order_id:str>/lines/<line:int>",
        [HttpMethod::Get],
        "order_line",
    ));

    let document = build(&routes, &DocRegistry::new(), &options(), Visibility::public(false)).unwrap();
    let wire = document.to_wire();

    let parameters = &wire["paths"]["/orders/{order_id}/lines/{line}"]["get"]["parameters"];
    assert_eq!(parameters[0]["name"], "order_id");
    assert_eq!(parameters[0]["schema"], json!({"type": "string"}));
    assert_eq!(parameters[1]["name"], "line");
    assert_eq!(parameters[1]["required"], true);
}

#[test]
fn test_reference_replaces_inferred_schema() {
    let routes = RouteTable::new().with(Route::new("/users/<id:int>", [HttpMethod::Get], "get_user"));
    let mut components = openapi3e::model::Components::new();
    components
        .add_schema(
            "UserId",
            Schema::builder()
                .schema_type(SchemaType::Integer)
                .description("Numeric user identifier")
                .build()
                .unwrap(),
        )
        .unwrap();

    let mut registry = DocRegistry::new();
    registry
        .handler("get_user")
        .parameter(Parameter::builder("id", Location::Path).schema(Reference::schema("UserId")))
        .unwrap();

    let options = options().with_components(components);
    let document = build(&routes, &registry, &options, Visibility::public(false)).unwrap();
    let parameter = &document.to_wire()["paths"]["/users/{id}"]["get"]["parameters"][0];

    assert_eq!(parameter["schema"], json!({"$ref": "#/components/schemas/UserId"}));
    assert_eq!(parameter["description"], "Numeric user identifier");
}

#[test]
fn test_conflicting_parameter_schemas_abort_the_build() {
    let routes = RouteTable::new().with(Route::new("/users/<id:int>", [HttpMethod::Get], "get_user"));
    let mut registry = DocRegistry::new();
    registry
        .handler("get_user")
        .parameter(Parameter::builder("id", Location::Path).schema(Schema::string()))
        .unwrap();

    let error = build(&routes, &registry, &options(), Visibility::public(false)).unwrap_err();
    assert!(matches!(error, OpenApiError::ParameterConflict { .. }));
    assert_eq!(
        error.to_string(),
        "parameter \"id\" disagrees on schema.type: Integer vs String"
    );
}

#[test]
fn test_same_name_in_query_and_header_are_separate_parameters() {
    let routes = RouteTable::new()
        .with(Route::new("/items", [HttpMethod::Get], "list_items"))
        .with(Route::new("/users/<id:int>", [HttpMethod::Get], "get_user"));
    let mut registry = DocRegistry::new();
    registry
        .handler("list_items")
        .parameter(Parameter::builder("trace", Location::Query).schema(Schema::integer()))
        .unwrap()
        .parameter(Parameter::builder("trace", Location::Header).schema(Schema::string()))
        .unwrap();
    registry
        .handler("get_user")
        .parameter(Parameter::builder("id", Location::Header).schema(Schema::string()))
        .unwrap();

    let document = build(&routes, &registry, &options(), Visibility::public(false)).unwrap();
    let wire = document.to_wire();

    assert_eq!(
        wire["paths"]["/items"]["get"]["parameters"],
        json!([
            {"name": "trace", "in": "query", "schema": {"type": "integer"}},
            {"name": "trace", "in": "header", "schema": {"type": "string"}}
        ])
    );
    assert_eq!(
        wire["paths"]["/users/{id}"]["get"]["parameters"],
        json!([
            {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}},
            {"name": "id", "in": "header", "schema": {"type": "string"}}
        ])
    );
}

#[test]
fn test_excluded_route_round_trip() {
    let routes = RouteTable::new()
        .with(Route::new("/pets", [HttpMethod::Get], "list_pets"))
        .with(Route::new("/internal/reindex", [HttpMethod::Post], "reindex"));
    let registry = || {
        let mut registry = DocRegistry::new();
        let _ = registry.handler("reindex").exclude().summary("Rebuild the index");
        registry
    };

    let mut shown = options();
    shown.show_excluded = true;
    let cache = DocumentCache::build(&routes, registry(), &shown).unwrap();

    let public = parse(&cache, SpecVariant::Public).unwrap();
    assert!(public["paths"].get("/internal/reindex").is_none());
    let all = parse(&cache, SpecVariant::All).unwrap();
    assert_eq!(
        all["paths"]["/internal/reindex"]["post"]["summary"],
        "[excluded] Rebuild the index"
    );

    let cache = DocumentCache::build(&routes, registry(), &options()).unwrap();
    let public = parse(&cache, SpecVariant::Public).unwrap();
    assert!(public["paths"].get("/internal/reindex").is_none());
    assert!(parse(&cache, SpecVariant::All).is_none());
}

#[test]
fn test_tag_only_on_excluded_operation_is_unused() {
    let routes = RouteTable::new()
        .with(Route::new("/pets", [HttpMethod::Get], "list_pets"))
        .with(Route::new("/audit", [HttpMethod::Get], "audit"));
    let registry = || {
        let mut registry = DocRegistry::new();
        let _ = registry
            .handler("list_pets")
            .tag("pets", Some("Everything about pets"))
            .unwrap();
        let _ = registry
            .handler("audit")
            .exclude()
            .tag("audit", Some("Internal audit trail"))
            .unwrap();
        registry
    };

    let hidden = build(&routes, &registry(), &options(), Visibility::public(false)).unwrap();
    assert_eq!(
        hidden.to_wire()["tags"],
        json!([{"name": "pets", "description": "Everything about pets"}])
    );

    let shown = build(&routes, &registry(), &options(), Visibility::public(true)).unwrap();
    let names: Vec<&str> = shown.tags().iter().map(|tag| tag.name()).collect();
    assert_eq!(names, ["audit", "pets"]);
}

#[test]
fn test_tag_descriptions_must_agree() {
    let mut registry = DocRegistry::new();
    let _ = registry.handler("a").tag("T", Some("A")).unwrap();

    assert!(registry.handler("b").tag("T", None).is_ok());
    assert!(registry.handler("c").tag("T", Some("A")).is_ok());
    assert!(matches!(
        registry.handler("d").tag("T", Some("B")),
        Err(OpenApiError::TagConflict { .. })
    ));
    assert_eq!(registry.tags().get("T").unwrap().description(), Some("A"));
}

#[test]
fn test_cloaked_operations_only_in_uncloaked_variant() {
    let routes = RouteTable::new()
        .with(Route::new("/pets", [HttpMethod::Get], "list_pets"))
        .with(Route::new("/admin/users", [HttpMethod::Get], "admin_users"));
    let options = options().with_cloak_fn(|context: &OperationContext<'_>| context.uri.starts_with("/admin"));

    let cache = DocumentCache::build(&routes, DocRegistry::new(), &options).unwrap();
    let public = parse(&cache, SpecVariant::Public).unwrap();
    assert!(public["paths"].get("/admin/users").is_none());
    let uncloaked = parse(&cache, SpecVariant::Uncloaked).unwrap();
    assert!(uncloaked["paths"]["/admin/users"]["get"].is_object());
}

#[test]
fn test_composite_handler_gets_method_prefixed_ids() {
    let routes = RouteTable::new().with(Route::composite(
        "/pets/<pet_id:int>",
        [
            (HttpMethod::Delete, "pet".into()),
            (HttpMethod::Get, "pet".into()),
        ],
    ));
    let options = options().with_operation_id_fn(camel_case_operation_id);

    let document = build(&routes, &DocRegistry::new(), &options, Visibility::public(false)).unwrap();
    let wire = document.to_wire();
    let item = &wire["paths"]["/pets/{pet_id}"];

    assert_eq!(item["get"]["operationId"], "getPet");
    assert_eq!(item["delete"]["operationId"], "deletePet");
    let methods: Vec<&String> = item.as_object().unwrap().keys().collect();
    assert_eq!(methods, ["get", "delete"]);
}

#[test]
fn test_declared_responses_replace_defaults() {
    let routes = RouteTable::new().with(Route::new("/pets", [HttpMethod::Post], "create_pet"));
    let mut registry = DocRegistry::new();
    let _ = registry.handler("create_pet").responses(
        Responses::new().with("201", Response::new("Created").unwrap()),
        true,
    );

    let document = build(&routes, &registry, &options(), Visibility::public(false)).unwrap();
    let wire = document.to_wire();

    assert_eq!(
        wire["paths"]["/pets"]["post"]["responses"],
        json!({"201": {"description": "Created"}})
    );
    assert!(wire.get("components").is_none());
}

#[test]
fn test_yaml_and_json_describe_the_same_document() {
    let routes = RouteTable::new().with(Route::new("/pets", [HttpMethod::Get], "list_pets"));
    let cache = DocumentCache::build(&routes, DocRegistry::new(), &options()).unwrap();

    let json = parse(&cache, SpecVariant::Public).unwrap();
    let yaml: Value =
        serde_yaml::from_str(cache.get(SpecVariant::Public, SpecFormat::Yaml).unwrap()).unwrap();
    assert_eq!(json, yaml);
}

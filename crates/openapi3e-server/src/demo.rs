//! A small pet store API, documented the way an application would
//! document its own handlers
//!
//! The routes are never served; they only feed the documents.

use openapi3e::model::{
    Components, Header, HttpMethod, Link, Location, MediaType, OAuthFlow, OAuthFlows, Parameter,
    Reference, RequestBody, Response, Responses, Schema, SchemaType, SecurityRequirement,
    SecurityScheme, Server, Tag,
};
use openapi3e::{
    BuildOptions, DocRegistry, DocumentCache, OperationContext, Result, Route, RouteSource,
    RouteTable,
};
use serde_json::json;
use tracing::info;

const JSON: &str = "application/json";

/// Operations under this prefix only appear in the uncloaked document
pub const ADMIN_PREFIX: &str = "/admin";

/// Route table, staged documentation and reusable components of the demo API
#[derive(Debug)]
pub struct PetStore {
    pub routes: RouteTable,
    pub registry: DocRegistry,
    pub components: Components,
}

impl PetStore {
    /// # Errors
    /// Returns the first invalid object or conflicting declaration
    pub fn define() -> Result<Self> {
        let mut registry = DocRegistry::new();
        registry
            .tags_mut()
            .register(&Tag::new("store")?.with_description("Access to pet store orders"))?;

        document_pets(&mut registry)?;
        document_maintenance(&mut registry)?;

        let store = Self {
            routes: routes(),
            registry,
            components: components()?,
        };
        info!(
            routes = store.routes.routes().len(),
            handlers = store.registry.len(),
            "defined pet store API"
        );
        Ok(store)
    }

    /// Build every document variant for this API
    ///
    /// # Errors
    /// Returns the first assembly or serialization failure
    pub fn into_cache(self, options: BuildOptions) -> Result<DocumentCache> {
        let options = options
            .with_components(self.components)
            .with_servers(vec![
                Server::new("http://petstore.example.com/v1")?.with_description("Production"),
            ])
            .with_security(vec![SecurityRequirement::new().with("api_key", Vec::<String>::new())])
            .with_cloak_fn(is_admin_route);
        DocumentCache::build(&self.routes, self.registry, &options)
    }
}

/// Cloak predicate hiding the admin endpoints from the public document
pub fn is_admin_route(context: &OperationContext<'_>) -> bool {
    context.uri.starts_with(ADMIN_PREFIX)
}

fn routes() -> RouteTable {
    RouteTable::new()
        .with(Route::new("/pets", [HttpMethod::Get], "list_pets").in_group("pets"))
        .with(Route::new("/pets", [HttpMethod::Post], "create_pet").in_group("pets"))
        .with(
            Route::composite(
                "/pets/<pet_id:int>",
                [
                    (HttpMethod::Get, "show_pet_by_id".into()),
                    (HttpMethod::Delete, "delete_pet".into()),
                ],
            )
            .in_group("pets"),
        )
        .with(Route::new("/admin/stats", [HttpMethod::Get], "admin_stats"))
        .with(Route::new("/internal/reindex", [HttpMethod::Post], "reindex"))
        .with(Route::new("/static/<file_uri:path>", [HttpMethod::Get], "static_files"))
        .with(Route::new("/openapi/<file>", [HttpMethod::Get], "serve_document"))
}

fn document_pets(registry: &mut DocRegistry) -> Result<()> {
    let page = Response::new("A page of pets")?
        .with_header(
            "x-next",
            Header::builder()
                .description("Link to the next page")
                .schema(Schema::string())
                .build()?,
        )
        .with_content(
            JSON,
            MediaType::with_schema(
                Schema::builder()
                    .schema_type(SchemaType::Array)
                    .items(Reference::schema("Pet"))
                    .build()?,
            ),
        );

    let _ = registry
        .handler("list_pets")
        .summary("List all pets")
        .tag("pets", Some("Everything about your pets"))?
        .parameter(
            Parameter::builder("limit", Location::Query)
                .description("How many items to return at one time (max 100)")
                .schema(Schema::integer()),
        )?
        .parameter(
            Parameter::builder("status", Location::Query)
                .description("Only pets with this status")
                .choices(["available", "pending", "sold"]),
        )?
        .response(200, page);

    let created = Response::new("Pet created")?
        .with_content(JSON, MediaType::with_schema(Reference::schema("Pet")))
        .with_link(
            "GetPetById",
            Link::builder()
                .operation_id("GET~~~pets~pet_id")
                .parameter("pet_id", json!("$response.body#/id"))
                .build()?,
        );
    let body = RequestBody::new(JSON, MediaType::with_schema(Reference::schema("NewPet")))
        .with_description("The pet to add")
        .with_required();
    body.validate()?;

    let _ = registry
        .handler("create_pet")
        .summary("Create a pet")
        .tag("pets", None)?
        .request_body(body)
        .responses(
            Responses::new()
                .with("201", created)
                .with("400", Reference::response("400")),
            true,
        );

    let _ = registry
        .handler("show_pet_by_id")
        .summary("Info for a specific pet")
        .tag("pets", None)?
        .parameter(Parameter::builder("pet_id", Location::Path).schema(Reference::schema("PetId")))?
        .response(200, Response::new("The pet")?.with_content(JSON, MediaType::with_schema(Reference::schema("Pet"))));

    let _ = registry
        .handler("delete_pet")
        .summary("Delete a pet")
        .deprecated()
        .tag("pets", None)?
        .parameter(Parameter::builder("pet_id", Location::Path).schema(Reference::schema("PetId")))?
        .security(vec![SecurityRequirement::new().with("petstore_auth", ["write:pets"])]);

    Ok(())
}

fn document_maintenance(registry: &mut DocRegistry) -> Result<()> {
    let _ = registry
        .handler("admin_stats")
        .summary("Store statistics")
        .tag("admin", Some("Operator endpoints"))?;

    let _ = registry
        .handler("reindex")
        .summary("Rebuild the search index")
        .exclude()
        .tag("maintenance", Some("Jobs not meant for API clients"))?;

    Ok(())
}

fn components() -> Result<Components> {
    let mut components = Components::new();

    components.add_schema(
        "PetId",
        Schema::builder()
            .schema_type(SchemaType::Integer)
            .format("int64")
            .description("Unique identifier of a pet")
            .build()?,
    )?;
    components.add_schema(
        "NewPet",
        Schema::builder()
            .schema_type(SchemaType::Object)
            .required("name")
            .property("name", Schema::string())
            .property("tag", Schema::string())
            .build()?,
    )?;
    components.add_schema(
        "Pet",
        Schema::builder()
            .all_of(Reference::schema("NewPet"))
            .all_of(
                Schema::builder()
                    .schema_type(SchemaType::Object)
                    .required("id")
                    .property("id", Reference::schema("PetId"))
                    .build()?,
            )
            .build()?,
    )?;

    components.add_security_scheme(
        "api_key",
        SecurityScheme::api_key("X-API-Key", Location::Header)?,
    )?;
    components.add_security_scheme(
        "petstore_auth",
        SecurityScheme::oauth2(OAuthFlows {
            implicit: Some(
                OAuthFlow::implicit("https://petstore.example.com/oauth/authorize")?
                    .with_scope("read:pets", "Read your pets")
                    .with_scope("write:pets", "Modify pets in your account"),
            ),
            ..OAuthFlows::default()
        })?,
    )?;

    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi3e::model::WireObject;
    use openapi3e::{SpecFormat, SpecVariant};

    fn cache() -> DocumentCache {
        let options = BuildOptions::new(openapi3e::model::Info::new("Pet Store", "1.0.0").unwrap());
        PetStore::define().unwrap().into_cache(options).unwrap()
    }

    #[test]
    fn test_public_document_hides_admin_internal_and_self_routes() {
        let cache = cache();
        let public = cache.document(SpecVariant::Public).unwrap();
        let uris: Vec<&str> = public.paths().iter().map(|(uri, _)| uri).collect();

        assert_eq!(uris, ["/pets", "/pets/{pet_id}"]);
        let tags: Vec<&str> = public.tags().iter().map(|tag| tag.name()).collect();
        assert_eq!(tags, ["pets"]);
    }

    #[test]
    fn test_uncloaked_document_shows_admin_routes() {
        let cache = cache();
        let uncloaked = cache.document(SpecVariant::Uncloaked).unwrap();

        assert!(uncloaked.paths().get("/admin/stats").is_some());
        assert!(uncloaked.paths().get("/internal/reindex").is_none());
        assert!(cache.get(SpecVariant::All, SpecFormat::Json).is_none());
    }

    #[test]
    fn test_pet_id_description_comes_from_component() {
        let wire = cache().document(SpecVariant::Public).unwrap().to_wire();
        let parameters = &wire["paths"]["/pets/{pet_id}"]["get"]["parameters"];

        assert_eq!(
            parameters,
            &json!([{
                "name": "pet_id",
                "in": "path",
                "required": true,
                "description": "Unique identifier of a pet",
                "schema": {"$ref": "#/components/schemas/PetId"}
            }])
        );
    }

    #[test]
    fn test_status_choices_become_an_enum() {
        let wire = cache().document(SpecVariant::Public).unwrap().to_wire();
        let status = &wire["paths"]["/pets"]["get"]["parameters"][1];

        assert_eq!(
            status["schema"],
            json!({"type": "string", "enum": ["available", "pending", "sold"]})
        );
    }
}
